//! Platform-specific implementations.
//!
//! Each platform provides:
//! - a `CursorDriver` (cursor get/set)
//! - a `HotkeyListener` (global low-level keyboard hook)
//! - a `Compositor` (translucency and rounded corners)
//! - the shell window

#[cfg(target_os = "windows")]
pub mod windows;

// Re-export the current platform's modules for convenience
#[cfg(target_os = "windows")]
pub use windows::*;
