//! Kitchen Timer - A state-managed countdown/count-up timer
//!
//! This library provides the timer state machine, the runtime that drives it
//! with a one-second tick, and the collaborators it talks to: persistence,
//! alarm playback and the terminal display.

pub mod commands;
pub mod config;
pub mod engine;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use commands::Command;
pub use config::Config;
pub use engine::{Effect, Step, TimerEngine};
pub use state::{AppState, TimerMode, TimerState};
pub use tasks::TimerRuntime;
pub use utils::signals::shutdown_signal;
