//! Shell window for Windows.

pub mod paint;
pub mod shell;

pub use shell::{run_shell, ShellOptions, WakeTarget};
