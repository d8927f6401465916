//! Periodic tick source

use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::debug;

use super::runtime::{Event, EventSender};

/// An armed one-second tick source
///
/// Each tick carries the generation it was armed with, so ticks still queued
/// after a disarm can be recognised as stale. Dropping the ticker disarms it.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a task sending `Event::Tick(generation)` every `period`, first one after `period`
    pub fn arm(events: EventSender, generation: u64, period: Duration) -> Self {
        debug!("Arming ticker #{}", generation);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if events.send(Event::Tick(generation)).is_err() {
                    break;
                }
            }
        });

        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        debug!("Disarming ticker #{}", self.generation);
        self.handle.abort();
    }
}
