//! Shell window layout and hit testing.
//!
//! Client-area coordinates for a `WINDOW_WIDTH` × `WINDOW_HEIGHT` window.
//! Anything outside a control drags the window.

use super::constants::*;

/// Axis-aligned rectangle, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Interactive regions of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Close,
    StartStop,
    FirstPersonToggle,
}

const MARGIN: i32 = 24;
const RIGHT: i32 = WINDOW_WIDTH - MARGIN;

pub const CLOSE_BUTTON: Rect = Rect::new(MARGIN, 20, MARGIN + 32, 52);
pub const STATUS_BADGE: Rect = Rect::new(RIGHT - 140, 20, RIGHT, 52);
pub const LOGO: Rect = Rect::new(WINDOW_WIDTH / 2 - 40, 82, WINDOW_WIDTH / 2 + 40, 162);
pub const TITLE: Rect = Rect::new(MARGIN, 178, RIGHT, 222);
pub const START_BUTTON: Rect = Rect::new(MARGIN, 330, RIGHT, 386);
pub const FIRST_PERSON_CARD: Rect = Rect::new(MARGIN, 398, RIGHT, 446);
pub const FIRST_PERSON_SWITCH: Rect = Rect::new(RIGHT - 58, 410, RIGHT - 14, 434);
pub const SET_POINT_HINT: Rect = Rect::new(MARGIN, 462, WINDOW_WIDTH / 2 - 6, 540);
pub const TOGGLE_HINT: Rect = Rect::new(WINDOW_WIDTH / 2 + 6, 462, RIGHT, 540);

/// Which control, if any, sits under a client-area point.
pub fn hit_test(x: i32, y: i32) -> Option<Control> {
    if CLOSE_BUTTON.contains(x, y) {
        Some(Control::Close)
    } else if START_BUTTON.contains(x, y) {
        Some(Control::StartStop)
    } else if FIRST_PERSON_CARD.contains(x, y) {
        Some(Control::FirstPersonToggle)
    } else {
        None
    }
}
