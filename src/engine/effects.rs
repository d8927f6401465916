//! Side-effect requests emitted by the timer engine

use std::time::Duration;

/// Work the engine asks its host to perform after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Arm the one-second tick source (replacing any armed one)
    StartTicking,
    /// Disarm the tick source before another tick can fire
    StopTicking,
    /// Start the alarm sound and stop it automatically after the given delay
    PlayAlarm { auto_stop_after: Duration },
    /// Silence the alarm and cancel its pending auto-stop
    StopAlarm,
    /// The displayed value changed
    Display { minutes: u64, seconds: u64 },
    /// The value landed on a five-minute mark
    Chime,
}

/// A single unit of adjustment, up or down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

impl Step {
    /// Map a scroll-wheel delta: scrolling up (negative delta) increments
    pub fn from_wheel(delta_y: i32) -> Self {
        if delta_y < 0 {
            Step::Up
        } else {
            Step::Down
        }
    }

    /// Apply this step `amount` times to `value`, clamping at zero
    pub fn apply(self, value: u64, amount: u64) -> u64 {
        match self {
            Step::Up => value.saturating_add(amount),
            Step::Down => value.saturating_sub(amount),
        }
    }
}
