//! Timer runtime: the single event loop that drives the engine

use std::{ops::ControlFlow, sync::Arc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    commands::{
        handlers::{handle_command, CommandOutcome},
        Command,
    },
    engine::{Effect, TICK_INTERVAL},
    services::{AudioPlayer, DisplaySink},
    state::AppState,
};
use super::{alarm::AlarmTimeout, ticker::Ticker};

/// Everything the runtime reacts to, processed one at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    /// A tick from the ticker armed with this generation
    Tick(u64),
    /// The alarm started with this generation has played long enough
    AlarmElapsed(u64),
}

pub type EventSender = mpsc::UnboundedSender<Event>;

/// Owns the tick source, the alarm timeout and the collaborators, and
/// executes the effects the engine emits
pub struct TimerRuntime {
    state: Arc<AppState>,
    events_tx: EventSender,
    events_rx: mpsc::UnboundedReceiver<Event>,
    player: Box<dyn AudioPlayer>,
    display: Box<dyn DisplaySink>,
    ticker: Option<Ticker>,
    alarm: Option<AlarmTimeout>,
    generation: u64,
}

impl TimerRuntime {
    pub fn new(
        state: Arc<AppState>,
        player: Box<dyn AudioPlayer>,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state,
            events_tx,
            events_rx,
            player,
            display,
            ticker: None,
            alarm: None,
            generation: 0,
        }
    }

    /// Handle for feeding commands into the runtime
    pub fn sender(&self) -> EventSender {
        self.events_tx.clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn is_alarm_pending(&self) -> bool {
        self.alarm.is_some()
    }

    /// Restore the persisted state, then process events until a quit command
    pub async fn run(mut self) {
        info!("Starting timer runtime");
        self.start();

        while let Some(event) = self.events_rx.recv().await {
            if self.handle_event(event).is_break() {
                break;
            }
        }

        info!("Timer runtime stopped");
    }

    /// Apply the effects needed to resume a restored timer
    pub fn start(&mut self) {
        match self.state.resume_effects() {
            Ok(effects) => self.execute(effects),
            Err(e) => error!("Failed to resume timer: {}", e),
        }
    }

    /// Process a single event to completion
    pub fn handle_event(&mut self, event: Event) -> ControlFlow<()> {
        match event {
            Event::Command(command) => match handle_command(&self.state, command) {
                Ok(CommandOutcome::Effects(effects)) => self.execute(effects),
                Ok(CommandOutcome::Status(status)) => match status.to_json() {
                    Ok(json) => self.display.show_status(&json),
                    Err(e) => warn!("{}", e),
                },
                Ok(CommandOutcome::Quit) => return ControlFlow::Break(()),
                Err(e) => error!("Command {} failed: {}", command, e),
            },
            Event::Tick(generation) => {
                if self.ticker.as_ref().map(Ticker::generation) != Some(generation) {
                    debug!("Dropping stale tick from ticker #{}", generation);
                    return ControlFlow::Continue(());
                }
                match self.state.tick() {
                    Ok(effects) => self.execute(effects),
                    Err(e) => error!("Failed to advance timer: {}", e),
                }
            }
            Event::AlarmElapsed(generation) => {
                if self.alarm.as_ref().map(AlarmTimeout::generation) != Some(generation) {
                    debug!("Ignoring cancelled alarm timeout #{}", generation);
                    return ControlFlow::Continue(());
                }
                self.alarm = None;
                info!("Alarm finished");
                if let Err(e) = self.player.stop_alarm() {
                    warn!("{}", e);
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::StartTicking => {
                // Disarm first so at most one ticker is ever live
                self.ticker = None;
                let generation = self.next_generation();
                self.ticker = Some(Ticker::arm(self.sender(), generation, TICK_INTERVAL));
            }
            Effect::StopTicking => {
                self.ticker = None;
            }
            Effect::PlayAlarm { auto_stop_after } => {
                info!("Time is up, sounding alarm for {:?}", auto_stop_after);
                if let Err(e) = self.player.play_alarm() {
                    error!("Failed to play alarm: {}", e);
                }
                let generation = self.next_generation();
                self.alarm = Some(AlarmTimeout::schedule(self.sender(), generation, auto_stop_after));
            }
            Effect::StopAlarm => {
                self.alarm = None;
                if let Err(e) = self.player.stop_alarm() {
                    warn!("{}", e);
                }
            }
            Effect::Display { minutes, seconds } => {
                self.display.render(minutes, seconds);
            }
            Effect::Chime => {
                debug!("Five-minute mark");
                if let Err(e) = self.player.chime() {
                    warn!("Failed to chime: {}", e);
                }
            }
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
