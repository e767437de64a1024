//! Global keyboard input for Windows.

pub mod keyboard_hook;

pub use keyboard_hook::LowLevelKeyboardHook;
