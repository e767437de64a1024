//! Commands marshalled onto the enforcement thread.
//!
//! The UI thread and the OS hook thread never touch freeze state directly.
//! They push a [`Command`] and the enforcement thread applies it, which keeps
//! the anchor point and mode flags single-writer.

use crossbeam_channel::Sender;

use crate::error::HookRegistrationError;
use crate::input::Hotkey;

/// Reply channel for a start request.
pub type StartReply = Sender<Result<(), HookRegistrationError>>;

/// A request for the enforcement thread.
#[derive(Debug)]
pub enum Command {
    /// Register hotkeys and begin enforcing (UI button).
    Start { reply: StartReply },
    /// Stop enforcing and release hotkeys (UI button). `reply` fires once
    /// no further cursor writes can happen.
    Stop { reply: Sender<()> },
    /// A global hotkey was pressed (OS hook thread).
    Key(Hotkey),
    /// Capture the live cursor position as the anchor.
    CapturePoint,
    /// Enable or disable first-person pass-through.
    SetFirstPersonMode(bool),
    /// Stop, release everything and exit the thread.
    Shutdown,
}

impl Command {
    /// Returns a human-readable description of the command for logging.
    pub fn description(&self) -> &'static str {
        match self {
            Command::Start { .. } => "start",
            Command::Stop { .. } => "stop",
            Command::Key(Hotkey::SetPoint) => "set-point key",
            Command::Key(Hotkey::Toggle) => "toggle key",
            Command::CapturePoint => "capture point",
            Command::SetFirstPersonMode(true) => "enable first-person mode",
            Command::SetFirstPersonMode(false) => "disable first-person mode",
            Command::Shutdown => "shutdown",
        }
    }
}
