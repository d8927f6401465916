//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc, time::Duration};
use clap::Parser;

use crate::{
    services::{AudioPlayer, CommandPlayer, JsonFileStore, MemoryStore, StateStore, TerminalBell},
    state::{TimerMode, TimerState},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "kitchen-timer")]
#[command(about = "A countdown/count-up kitchen timer for the terminal")]
#[command(version = "1.0.0")]
pub struct Config {
    /// File that keeps the timer state between runs
    #[arg(long, default_value = ".kitchen-timer.json")]
    pub state_file: PathBuf,

    /// Keep the timer state in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Shell command that plays the alarm (terminal bell if unset)
    #[arg(short, long)]
    pub alarm_command: Option<String>,

    /// How long the alarm sounds, in milliseconds
    #[arg(long, default_value = "3000")]
    pub alarm_ms: u64,

    /// Minutes to preset when the restored timer is idle at zero
    #[arg(short, long, default_value = "0")]
    pub minutes: u64,

    /// Seconds to preset when the restored timer is idle at zero
    #[arg(short, long, default_value = "0")]
    pub seconds: u64,

    /// Don't mirror the time into the terminal title
    #[arg(long)]
    pub no_title: bool,

    /// Read line commands even when stdin is a terminal (no keys or mouse wheel)
    #[arg(long)]
    pub line_input: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn alarm_duration(&self) -> Duration {
        Duration::from_millis(self.alarm_ms)
    }

    pub fn preset_seconds(&self) -> u64 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    /// Apply the preset to a fresh timer; a timer with progress is left alone
    pub fn apply_preset(&self, state: TimerState) -> TimerState {
        let preset = self.preset_seconds();
        if preset > 0 && state == TimerState::new() {
            TimerState::with(preset, TimerMode::Idle)
        } else {
            state
        }
    }

    /// Build the state store selected on the command line
    pub fn state_store(&self) -> Arc<dyn StateStore> {
        if self.no_persist {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(JsonFileStore::new(&self.state_file))
        }
    }

    /// Build the audio player selected on the command line
    pub fn audio_player(&self) -> Box<dyn AudioPlayer> {
        match &self.alarm_command {
            Some(command) => Box::new(CommandPlayer::new(command.clone())),
            None => Box::new(TerminalBell::new()),
        }
    }
}
