use crate::domain::LendingEvent;
use crate::ports::event_recorder::{EventRecorder as EventRecorderTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory implementation of EventRecorder
///
/// Appends every checkout and return to a growing audit log and
/// emits one log line per event. `records()` exposes a snapshot
/// for inspection.
pub struct EventRecorder {
    log: Mutex<Vec<LendingEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything recorded so far, oldest first
    pub fn records(&self) -> Vec<LendingEvent> {
        self.log.lock().unwrap().clone()
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRecorderTrait for EventRecorder {
    /// Append the event to the audit log
    async fn record(&self, event: &LendingEvent) -> Result<()> {
        tracing::info!(
            "{}: item {} / customer {} on {}",
            event.kind.as_str(),
            event.loan.item_id,
            event.loan.customer_id,
            event.occurred_on
        );
        self.log.lock().unwrap().push(event.clone());
        Ok(())
    }
}
