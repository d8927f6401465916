//! Utility functions module
//!
//! This module contains process-level helpers.

pub mod signals;
pub mod terminal;

// Re-export main functions
pub use signals::shutdown_signal;
pub use terminal::{LogWriter, TerminalGuard};
