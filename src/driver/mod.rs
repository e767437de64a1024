//! OS abstraction consumed by the core.
//!
//! The freeze loop only needs [`CursorDriver`]. Window chrome effects sit
//! behind [`Compositor`] so the core has no dependency on windowing.

pub mod compositor;
pub mod cursor;

pub use compositor::{apply_window_effects, Compositor, NoopCompositor, WindowEffects, WindowHandle};
pub use cursor::CursorDriver;
