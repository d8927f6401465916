//! External collaborator module
//!
//! This module contains the I/O the timer core relies on but does not own:
//! state persistence, sound playback and the terminal display.

pub mod audio;
pub mod display;
pub mod persistence;

// Re-export main types
pub use audio::{AudioPlayer, CommandPlayer, TerminalBell};
pub use display::{format_clock, DisplaySink, TerminalDisplay};
pub use persistence::{load_or_default, JsonFileStore, MemoryStore, StateStore};
