//! Cursor freeze core. Everything outside `platform` is free of OS FFI so
//! it runs as ordinary unit and integration tests.

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod freeze;
pub mod input;
pub mod logging;
pub mod model;
pub mod platform;

// Re-export the types the shell works with
pub use config::FreezeConfig;
pub use error::{CompositorEffectError, CursorAccessError, FreezeError, HookRegistrationError};
pub use events::{StatusBridge, StatusPublisher};
pub use freeze::{FreezeMachine, FreezeTool, MachineState};
pub use model::{Point, Rgba, StatusEvent};
