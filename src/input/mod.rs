//! Input handling: fixed hotkey bindings and the listener seam.
//!
//! Platform hooks live in `platform::<os>::input`.

pub mod hotkeys;

pub use hotkeys::{Hotkey, HotkeyListener, KeyCallback, PressFilter};
