//! Alarm auto-stop timer

use std::time::Duration;
use tokio::{task::JoinHandle, time::sleep};

use super::runtime::{Event, EventSender};

/// A pending `Event::AlarmElapsed`; dropping it cancels the auto-stop
#[derive(Debug)]
pub struct AlarmTimeout {
    generation: u64,
    handle: JoinHandle<()>,
}

impl AlarmTimeout {
    pub fn schedule(events: EventSender, generation: u64, after: Duration) -> Self {
        let handle = tokio::spawn(async move {
            sleep(after).await;
            let _ = events.send(Event::AlarmElapsed(generation));
        });

        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for AlarmTimeout {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
