//! Application domain model.
//!
//! Pure types with no FFI dependencies: screen points, status
//! notifications, the shell view model and configuration constants.

pub mod app_state;
pub mod constants;
pub mod layout;
pub mod point;
pub mod status;
pub mod theme;

pub use app_state::ShellState;
pub use constants::*;
pub use layout::{Control, Rect};
pub use point::Point;
pub use status::{BadgeKind, StatusEvent, StatusKind};
pub use theme::{Palette, Rgba};
