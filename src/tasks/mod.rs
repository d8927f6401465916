//! Background tasks module
//!
//! This module contains the runtime event loop and the tasks that feed it:
//! the tick source, the alarm auto-stop and the command readers.

pub mod alarm;
pub mod input;
pub mod runtime;
pub mod ticker;

// Re-export main types
pub use input::{spawn_stdin_reader, spawn_terminal_reader};
pub use runtime::{Event, EventSender, TimerRuntime};
