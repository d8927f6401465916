//! Timer engine module
//!
//! The engine owns the [`TimerState`] and is the only thing that mutates it.
//! Every operation is a single synchronous transition that returns the
//! effects the host has to carry out (tick source, audio, display).

pub mod effects;

use std::time::Duration;
use tracing::debug;

use crate::state::{TimerMode, TimerState};

pub use effects::{Effect, Step};

/// How long the alarm sounds before it stops on its own
pub const DEFAULT_ALARM_DURATION: Duration = Duration::from_millis(3000);

/// Cadence of the tick source while counting
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Chime whenever the value lands on a multiple of this many seconds
pub const CHIME_EVERY_SECONDS: u64 = 5 * 60;

/// Finite-state machine driving the kitchen timer
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    alarm_duration: Duration,
}

impl TimerEngine {
    /// Create an engine from a (possibly restored) state
    pub fn new(state: TimerState) -> Self {
        Self {
            state: state.normalized(),
            alarm_duration: DEFAULT_ALARM_DURATION,
        }
    }

    /// Override how long the alarm plays before auto-stop
    pub fn with_alarm_duration(mut self, alarm_duration: Duration) -> Self {
        self.alarm_duration = alarm_duration;
        self
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    /// Add or remove one minute
    pub fn adjust_minutes(&mut self, step: Step) -> Vec<Effect> {
        self.adjust(step, 60)
    }

    /// Add or remove one second
    pub fn adjust_seconds(&mut self, step: Step) -> Vec<Effect> {
        self.adjust(step, 1)
    }

    fn adjust(&mut self, step: Step, amount: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.mode.is_adjustable() {
            debug!("Ignoring adjustment while in {}", self.state.mode);
            return effects;
        }

        let seconds = step.apply(self.state.seconds, amount);
        self.set_seconds(seconds, &mut effects);
        effects
    }

    /// Start, pause or resume depending on the current mode
    pub fn toggle_start(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        let next = match self.state.mode {
            TimerMode::Idle if self.state.seconds > 0 => TimerMode::CountingDown,
            TimerMode::Idle => TimerMode::CountingUp,
            TimerMode::PausedDown => TimerMode::CountingDown,
            TimerMode::PausedUp => TimerMode::CountingUp,
            TimerMode::CountingDown => TimerMode::PausedDown,
            TimerMode::CountingUp => TimerMode::PausedUp,
            TimerMode::Alarm => {
                debug!("Ignoring start/pause while the alarm is set; clear it first");
                return effects;
            }
        };

        self.set_mode(next, &mut effects);
        effects
    }

    /// Reset to zero and idle, silencing the alarm if it is set
    pub fn clear(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        let previous = self.state.mode;

        self.set_seconds(0, &mut effects);
        self.set_mode(TimerMode::Idle, &mut effects);

        if previous == TimerMode::Alarm {
            effects.push(Effect::StopAlarm);
        }
        effects
    }

    /// Advance the active count by exactly one second
    pub fn tick(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.state.mode {
            TimerMode::CountingDown => {
                let remaining = self.state.seconds.saturating_sub(1);
                if remaining > 0 {
                    self.set_seconds(remaining, &mut effects);
                } else {
                    self.set_seconds(0, &mut effects);
                    self.set_mode(TimerMode::Alarm, &mut effects);
                    effects.push(Effect::PlayAlarm {
                        auto_stop_after: self.alarm_duration,
                    });
                }
            }
            TimerMode::CountingUp => {
                let elapsed = Step::Up.apply(self.state.seconds, 1);
                self.set_seconds(elapsed, &mut effects);
            }
            mode => {
                debug!("Ignoring tick while in {}", mode);
            }
        }
        effects
    }

    /// Effects needed to bring a freshly restored state back to life
    ///
    /// A restored alarm stays silent; only entering `Alarm` plays it.
    pub fn resume(&self) -> Vec<Effect> {
        let mut effects = vec![self.display_effect()];
        if self.state.is_active() {
            effects.push(Effect::StartTicking);
        }
        effects
    }

    fn display_effect(&self) -> Effect {
        Effect::Display {
            minutes: self.state.minutes(),
            seconds: self.state.seconds_part(),
        }
    }

    fn set_seconds(&mut self, seconds: u64, effects: &mut Vec<Effect>) {
        if seconds == self.state.seconds {
            return;
        }

        self.state.seconds = seconds;
        effects.push(self.display_effect());

        if seconds > 0 && seconds % CHIME_EVERY_SECONDS == 0 {
            effects.push(Effect::Chime);
        }
    }

    fn set_mode(&mut self, mode: TimerMode, effects: &mut Vec<Effect>) {
        let previous = self.state.mode;
        if previous == mode {
            return;
        }

        debug!("Timer mode {} -> {}", previous, mode);
        self.state.mode = mode;

        match (previous.is_active(), mode.is_active()) {
            (false, true) => effects.push(Effect::StartTicking),
            (true, false) => effects.push(Effect::StopTicking),
            _ => {}
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerState::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_at(seconds: u64, mode: TimerMode) -> TimerEngine {
        TimerEngine::new(TimerState::with(seconds, mode))
    }

    fn engine_up(seconds: u64) -> TimerEngine {
        engine_at(seconds, TimerMode::CountingUp)
    }

    fn count_alarms(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::PlayAlarm { .. }))
            .count()
    }

    #[test]
    fn test_adjust_never_goes_negative() {
        let mut engine = TimerEngine::default();
        let mut expected: i64 = 0;

        let steps = [Step::Up, Step::Down, Step::Down, Step::Up, Step::Down, Step::Down, Step::Up];
        for (i, step) in steps.iter().cycle().take(70).enumerate() {
            let delta = if *step == Step::Up { 1 } else { -1 };
            if i % 3 == 0 {
                engine.adjust_minutes(*step);
                expected = (expected + delta * 60).max(0);
            } else {
                engine.adjust_seconds(*step);
                expected = (expected + delta).max(0);
            }
            assert_eq!(engine.state().seconds as i64, expected);
        }

        engine.clear();
        assert!(engine.adjust_seconds(Step::Down).is_empty());
        assert!(engine.adjust_minutes(Step::Down).is_empty());
        assert_eq!(engine.state().seconds, 0);
    }

    #[test]
    fn test_adjust_keeps_mode_while_running() {
        let mut engine = engine_at(90, TimerMode::CountingDown);
        let effects = engine.adjust_minutes(Step::Up);
        assert_eq!(engine.state().seconds, 150);
        assert_eq!(engine.mode(), TimerMode::CountingDown);
        assert_eq!(effects, vec![Effect::Display { minutes: 2, seconds: 30 }]);
    }

    #[test]
    fn test_adjust_ignored_in_alarm() {
        let mut engine = engine_at(0, TimerMode::Alarm);
        assert!(engine.adjust_minutes(Step::Up).is_empty());
        assert_eq!(*engine.state(), TimerState::with(0, TimerMode::Alarm));
    }

    #[test]
    fn test_toggle_from_idle() {
        let mut up = TimerEngine::default();
        assert_eq!(up.toggle_start(), vec![Effect::StartTicking]);
        assert_eq!(up.mode(), TimerMode::CountingUp);

        let mut down = engine_at(125, TimerMode::Idle);
        assert_eq!(down.toggle_start(), vec![Effect::StartTicking]);
        assert_eq!(down.mode(), TimerMode::CountingDown);
    }

    #[test]
    fn test_toggle_pauses_and_resumes() {
        let mut engine = engine_at(30, TimerMode::CountingDown);
        assert_eq!(engine.toggle_start(), vec![Effect::StopTicking]);
        assert_eq!(engine.mode(), TimerMode::PausedDown);
        assert_eq!(engine.toggle_start(), vec![Effect::StartTicking]);
        assert_eq!(engine.mode(), TimerMode::CountingDown);

        let mut engine = engine_up(10);
        engine.toggle_start();
        assert_eq!(engine.mode(), TimerMode::PausedUp);
        engine.toggle_start();
        assert_eq!(engine.mode(), TimerMode::CountingUp);
        assert_eq!(engine.state().seconds, 10);
    }

    #[test]
    fn test_toggle_in_alarm_is_noop() {
        let mut engine = engine_at(0, TimerMode::Alarm);
        assert!(engine.toggle_start().is_empty());
        assert_eq!(engine.mode(), TimerMode::Alarm);
    }

    #[test]
    fn test_countdown_last_tick_enters_alarm_once() {
        let mut engine = engine_at(1, TimerMode::CountingDown);
        let effects = engine.tick();

        assert_eq!(*engine.state(), TimerState::with(0, TimerMode::Alarm));
        assert_eq!(count_alarms(&effects), 1);
        assert_eq!(
            effects,
            vec![
                Effect::Display { minutes: 0, seconds: 0 },
                Effect::StopTicking,
                Effect::PlayAlarm { auto_stop_after: DEFAULT_ALARM_DURATION },
            ]
        );

        // Stale ticks after the alarm do nothing
        assert!(engine.tick().is_empty());
        assert_eq!(*engine.state(), TimerState::with(0, TimerMode::Alarm));
    }

    #[test]
    fn test_countdown_adjusted_to_zero_alarms_on_next_tick() {
        let mut engine = engine_at(1, TimerMode::CountingDown);
        engine.adjust_seconds(Step::Down);
        assert_eq!(*engine.state(), TimerState::with(0, TimerMode::CountingDown));

        let effects = engine.tick();
        assert_eq!(engine.mode(), TimerMode::Alarm);
        assert_eq!(count_alarms(&effects), 1);
    }

    #[test]
    fn test_count_up_tick() {
        let mut engine = engine_up(59);
        let effects = engine.tick();
        assert_eq!(*engine.state(), TimerState::with(60, TimerMode::CountingUp));
        assert_eq!(effects, vec![Effect::Display { minutes: 1, seconds: 0 }]);
    }

    #[test]
    fn test_tick_ignored_when_not_counting() {
        for mode in [TimerMode::Idle, TimerMode::PausedDown, TimerMode::PausedUp, TimerMode::Alarm] {
            let seconds = if mode == TimerMode::Alarm { 0 } else { 42 };
            let mut engine = engine_at(seconds, mode);
            assert!(engine.tick().is_empty());
            assert_eq!(*engine.state(), TimerState::with(seconds, mode));
        }
    }

    #[test]
    fn test_clear_from_every_mode() {
        let cases = [
            (TimerMode::Idle, 10, vec![Effect::Display { minutes: 0, seconds: 0 }]),
            (
                TimerMode::CountingDown,
                10,
                vec![Effect::Display { minutes: 0, seconds: 0 }, Effect::StopTicking],
            ),
            (
                TimerMode::CountingUp,
                10,
                vec![Effect::Display { minutes: 0, seconds: 0 }, Effect::StopTicking],
            ),
            (TimerMode::PausedDown, 10, vec![Effect::Display { minutes: 0, seconds: 0 }]),
            (TimerMode::PausedUp, 10, vec![Effect::Display { minutes: 0, seconds: 0 }]),
            (TimerMode::Alarm, 0, vec![Effect::StopAlarm]),
        ];

        for (mode, seconds, expected) in cases {
            let mut engine = engine_at(seconds, mode);
            assert_eq!(engine.clear(), expected, "clear from {}", mode);
            assert_eq!(*engine.state(), TimerState::new());
        }
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut engine = engine_at(0, TimerMode::Alarm);
        engine.clear();
        let once = *engine.state();
        assert!(engine.clear().is_empty());
        assert_eq!(*engine.state(), once);
    }

    #[test]
    fn test_one_minute_countdown_scenario() {
        let mut engine = TimerEngine::default();
        engine.adjust_minutes(Step::Up);
        assert_eq!(engine.state().seconds, 60);

        engine.toggle_start();
        assert_eq!(engine.mode(), TimerMode::CountingDown);

        let mut alarms = 0;
        for _ in 0..60 {
            alarms += count_alarms(&engine.tick());
        }
        assert_eq!(*engine.state(), TimerState::with(0, TimerMode::Alarm));
        assert_eq!(alarms, 1);
    }

    #[test]
    fn test_chime_on_five_minute_marks() {
        let mut engine = engine_at(299, TimerMode::CountingUp);
        assert!(engine.tick().contains(&Effect::Chime));
        assert!(!engine.tick().contains(&Effect::Chime));

        let mut engine = engine_at(4 * 60, TimerMode::Idle);
        assert!(engine.adjust_minutes(Step::Up).contains(&Effect::Chime));
    }

    #[test]
    fn test_resume_rearms_active_modes_only() {
        assert_eq!(
            engine_at(75, TimerMode::CountingDown).resume(),
            vec![Effect::Display { minutes: 1, seconds: 15 }, Effect::StartTicking]
        );
        assert_eq!(
            engine_at(75, TimerMode::PausedDown).resume(),
            vec![Effect::Display { minutes: 1, seconds: 15 }]
        );
        assert_eq!(
            engine_at(0, TimerMode::Alarm).resume(),
            vec![Effect::Display { minutes: 0, seconds: 0 }]
        );
    }

    #[test]
    fn test_custom_alarm_duration() {
        let mut engine = engine_at(1, TimerMode::CountingDown)
            .with_alarm_duration(Duration::from_millis(500));
        assert!(engine.tick().contains(&Effect::PlayAlarm {
            auto_stop_after: Duration::from_millis(500)
        }));
    }
}
