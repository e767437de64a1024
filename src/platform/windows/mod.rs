//! Windows implementation using the Win32 API and DWM.
//!
//! - `cursor`: `GetCursorPos` / `SetCursorPos` driver
//! - `input`: global low-level keyboard hook
//! - `compositor`: acrylic backdrop and rounded corners
//! - `ui`: the frameless GDI shell window

pub mod compositor;
pub mod cursor;
pub mod input;
pub mod ui;

pub use compositor::DwmCompositor;
pub use cursor::Win32Cursor;
pub use input::LowLevelKeyboardHook;
pub use ui::{run_shell, ShellOptions, WakeTarget};

/// Whether a `GetMessageW` return value means "keep pumping".
///
/// Zero is `WM_QUIT` and -1 is an error; both end a message loop.
pub(crate) fn keep_pumping(get_message: i32) -> bool {
    get_message > 0
}
