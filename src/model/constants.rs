//! Configuration constants and default values.
//!
//! Hotkey bindings, enforcement defaults, window geometry and the
//! compositor tint used by the shell window.

use super::theme::Rgba;

// === Hotkeys ===

/// Virtual-key code that captures the anchor point (`Q`).
pub const VK_SET_POINT: u32 = 0x51;

/// Virtual-key code that toggles enforcement (`F3`).
pub const VK_TOGGLE: u32 = 0x72;

/// Label shown for the set-point key.
pub const SET_POINT_KEY_LABEL: &str = "Q";

/// Label shown for the toggle key.
pub const TOGGLE_KEY_LABEL: &str = "F3";

// === Enforcement Defaults ===

/// Default enforcement tick in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 5;

/// Fastest allowed enforcement tick in milliseconds.
pub const MIN_TICK_MS: u64 = 1;

/// Slowest allowed enforcement tick in milliseconds.
pub const MAX_TICK_MS: u64 = 100;

/// Default drift tolerance in pixels (0 = any movement is corrected).
pub const DEFAULT_EPSILON_PX: u32 = 0;

/// Largest accepted drift tolerance in pixels.
pub const MAX_EPSILON_PX: u32 = 50;

/// Environment variable overriding the tick interval.
pub const ENV_TICK_MS: &str = "ROFREEZE_TICK_MS";

/// Environment variable overriding the drift tolerance.
pub const ENV_EPSILON: &str = "ROFREEZE_EPSILON";

// === Status Messages ===

pub const MSG_RUNNING: &str = "Running...";
pub const MSG_FROZEN: &str = "Frozen";
pub const MSG_STOPPED: &str = "Stopped";
pub const MSG_READY: &str = "Ready";

// === Window ===

/// Shell window width in pixels.
pub const WINDOW_WIDTH: i32 = 380;

/// Shell window height in pixels.
pub const WINDOW_HEIGHT: i32 = 575;

/// Corner radius of the shell window in pixels.
pub const CORNER_RADIUS: i32 = 20;

/// Acrylic tint colour behind the shell window.
pub const ACRYLIC_TINT: Rgba = Rgba::rgb(0x0A, 0x15, 0x20);

/// Acrylic tint alpha (0 = clear, 255 = opaque).
pub const ACRYLIC_ALPHA: u8 = 200;
