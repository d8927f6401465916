//! Timer state structure and management

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current phase of the timer's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    #[default]
    Idle,
    CountingDown,
    CountingUp,
    PausedDown,
    PausedUp,
    /// A countdown reached zero; stays here until cleared
    Alarm,
}

impl TimerMode {
    /// Whether a tick source should be armed in this mode
    pub fn is_active(self) -> bool {
        matches!(self, TimerMode::CountingDown | TimerMode::CountingUp)
    }

    /// Whether the user can still adjust the duration
    pub fn is_adjustable(self) -> bool {
        !matches!(self, TimerMode::Alarm)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Idle => "idle",
            TimerMode::CountingDown => "counting_down",
            TimerMode::CountingUp => "counting_up",
            TimerMode::PausedDown => "paused_down",
            TimerMode::PausedUp => "paused_up",
            TimerMode::Alarm => "alarm",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timer state: the displayed time value and the current mode
///
/// Minutes and seconds are always derived from `seconds`, never stored apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerState {
    pub seconds: u64,
    pub mode: TimerMode,
}

impl TimerState {
    /// Create a new idle timer at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timer state with the given value and mode
    pub fn with(seconds: u64, mode: TimerMode) -> Self {
        Self { seconds, mode }
    }

    pub fn minutes(&self) -> u64 {
        self.seconds / 60
    }

    pub fn seconds_part(&self) -> u64 {
        self.seconds % 60
    }

    /// Check if the timer is counting in either direction
    pub fn is_active(&self) -> bool {
        self.mode.is_active()
    }

    /// Format as `MM:SS`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds_part())
    }

    /// Repair a state read from outside the engine so the alarm invariant holds
    pub fn normalized(self) -> Self {
        match self.mode {
            TimerMode::Alarm if self.seconds != 0 => Self::with(0, TimerMode::Alarm),
            _ => self,
        }
    }
}
