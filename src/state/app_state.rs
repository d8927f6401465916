//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::TimerState;
use crate::{
    engine::{Effect, TimerEngine},
    services::StateStore,
};

/// Shared application state: the timer engine plus its persistence and bookkeeping
pub struct AppState {
    /// The state machine; only ever mutated under this lock
    pub engine: Arc<Mutex<TimerEngine>>,
    /// Where every mutation is saved
    pub store: Arc<dyn StateStore>,
    /// Process metadata
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState around an engine and a store
    pub fn new(engine: TimerEngine, store: Arc<dyn StateStore>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            store,
            start_time: Instant::now(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run a user command against the engine and record it as the last action
    pub fn update_timer<F>(&self, action: &str, updater: F) -> Result<Vec<Effect>, String>
    where
        F: FnOnce(&mut TimerEngine) -> Vec<Effect>,
    {
        let effects = self.transition(updater)?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(effects)
    }

    /// Advance the engine by one tick
    pub fn tick(&self) -> Result<Vec<Effect>, String> {
        self.transition(TimerEngine::tick)
    }

    /// Effects that restart a restored timer
    pub fn resume_effects(&self) -> Result<Vec<Effect>, String> {
        self.engine
            .lock()
            .map(|engine| engine.resume())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    fn transition<F>(&self, updater: F) -> Result<Vec<Effect>, String>
    where
        F: FnOnce(&mut TimerEngine) -> Vec<Effect>,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let before = *engine.state();
        let effects = updater(&mut *engine);
        let after = *engine.state();
        drop(engine); // Release the lock before touching the disk

        if after != before {
            self.persist(&after);
        }

        Ok(effects)
    }

    /// Save the given state, logging (not propagating) failures
    pub fn persist(&self, state: &TimerState) {
        match self.store.save(state) {
            Ok(()) => debug!("Persisted {} ({})", state.display(), state.mode),
            Err(e) => warn!("Failed to persist timer state: {:#}", e),
        }
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.engine.lock()
            .map(|engine| *engine.state())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Calculate process uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
