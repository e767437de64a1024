//! Cursor freeze core: the state machine and the thread that drives it.

pub mod machine;
pub mod worker;

pub use machine::{FreezeMachine, MachineState};
pub use worker::FreezeTool;
