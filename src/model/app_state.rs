//! Shell view model (pure Rust, no FFI).
//!
//! The shell never reads freeze-loop state directly. It folds published
//! [`StatusEvent`]s and the results of its own start/stop requests into
//! this structure and renders from it.

use super::constants::*;
use super::status::{BadgeKind, StatusEvent, StatusKind};
use super::theme::Palette;

/// Everything the shell window needs to paint itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    /// Tool armed from the start/stop button.
    pub running: bool,
    /// First-person / mouse-lock toggle position.
    pub first_person_mode: bool,
    /// Badge state.
    pub badge: BadgeKind,
    /// Badge text (last status message).
    pub badge_text: String,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: false,
            first_person_mode: false,
            badge: BadgeKind::Ready,
            badge_text: MSG_READY.to_string(),
        }
    }
}

impl ShellState {
    /// Fold one published status into the view.
    ///
    /// `Running...` and `Stopped` also move the start button, so a loop
    /// halted or resumed from the toggle key is reflected there.
    pub fn apply_status(&mut self, event: &StatusEvent) {
        match event.kind() {
            StatusKind::Running => self.running = true,
            StatusKind::Stopped => self.running = false,
            StatusKind::PointSet | StatusKind::Frozen => {}
        }
        self.badge = BadgeKind::classify(event.message());
        self.badge_text = event.message().to_string();
    }

    /// Record the outcome of a start request.
    ///
    /// A failed start leaves the shell idle and shows the reason instead of
    /// a running badge.
    pub fn apply_start_result(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.running = true;
                self.badge = BadgeKind::Running;
                self.badge_text = MSG_RUNNING.to_string();
            }
            Err(reason) => {
                self.running = false;
                self.badge = BadgeKind::Ready;
                self.badge_text = format!("Start failed: {reason}");
            }
        }
    }

    /// Record a completed stop request.
    pub fn apply_stopped(&mut self) {
        self.running = false;
        self.badge = BadgeKind::Ready;
        self.badge_text = MSG_STOPPED.to_string();
    }

    /// Label of the primary button.
    pub fn button_label(&self) -> &'static str {
        if self.running {
            "Stop"
        } else {
            "Get Started"
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_badge(self.badge)
    }
}
