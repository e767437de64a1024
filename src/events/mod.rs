//! Cross-thread messaging.
//!
//! Two channels connect the threads of the application:
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐
//! │  UI thread  │   │  OS hook    │
//! │  (buttons)  │   │  (Q / F3)   │
//! └──────┬──────┘   └──────┬──────┘
//!        │ Command         │ Command::Key
//!        ▼                 ▼
//! ┌─────────────────────────────────┐
//! │      enforcement thread         │
//! │  FreezeMachine + tick timer     │
//! └───────────────┬─────────────────┘
//!                 │ publish(StatusEvent)
//!                 ▼
//! ┌─────────────────────────────────┐
//! │   StatusBridge (EventBus)       │──wake──▶ UI thread drains
//! └─────────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`types`]: `Command` definitions
//! - [`bus`]: generic `EventBus` and `EventPublisher`

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventPublisher, Waker};
pub use types::{Command, StartReply};

use crate::model::StatusEvent;

/// Carries status notifications from the enforcement thread to the UI.
pub type StatusBridge = EventBus<StatusEvent>;

/// Publishing side of the [`StatusBridge`].
pub type StatusPublisher = EventPublisher<StatusEvent>;
