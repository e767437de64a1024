//! Error taxonomy.
//!
//! Only [`HookRegistrationError`] reaches the caller of `start_tool`.
//! Cursor access errors are absorbed per tick and compositor errors at the
//! window-chrome boundary.

use thiserror::Error;

use crate::input::Hotkey;

/// The OS refused (or we failed to set up) the global keyboard hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookRegistrationError {
    #[error("global hook for {key} denied by the OS (code {code})")]
    Denied { key: Hotkey, code: i32 },
    #[error("hook thread could not be started: {0}")]
    ThreadSpawn(String),
    #[error("a keyboard hook is already installed in this process")]
    AlreadyInstalled,
}

/// Transient failure reading or writing the cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorAccessError {
    #[error("cursor position unavailable: {0}")]
    Read(String),
    #[error("cursor position rejected: {0}")]
    Write(String),
}

/// A cosmetic window effect could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositorEffectError {
    #[error("{effect} is not supported on this system")]
    Unsupported { effect: &'static str },
    #[error("{effect} failed: {reason}")]
    Failed { effect: &'static str, reason: String },
}

/// Errors surfaced by the freeze tool handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FreezeError {
    #[error(transparent)]
    HookRegistration(#[from] HookRegistrationError),
    #[error("freeze worker is not running")]
    WorkerUnavailable,
    #[error("freeze worker could not be spawned: {0}")]
    WorkerSpawn(String),
}
