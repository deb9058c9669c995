//! Operator-driven replay of unprocessed events.
//!
//! Retry is an explicit action: clear the recorded failure, re-dispatch, and
//! record the new outcome. There is no automatic backoff loop in this core;
//! an event that keeps failing keeps its row and its error until someone (or
//! a fixed deployment) replays it successfully.

use chrono::Utc;

use orgspine_core::EventId;
use orgspine_events::{DispatchError, EventDispatcher, EventStore, StoreError};

/// Outcome of one replay pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub attempted: usize,
    pub processed: usize,
    pub failed: usize,
}

pub struct Replayer<S, D> {
    store: S,
    dispatcher: D,
}

impl<S, D> Replayer<S, D>
where
    S: EventStore,
    D: EventDispatcher,
{
    pub fn new(store: S, dispatcher: D) -> Self {
        Self { store, dispatcher }
    }

    /// Clear the failure on one event and re-dispatch it.
    pub fn retry(&self, event_id: EventId) -> Result<Result<(), DispatchError>, StoreError> {
        self.store.clear_failure(event_id)?;
        let event = self.store.get(event_id)?;

        match self.dispatcher.dispatch(&event) {
            Ok(()) => {
                self.store.mark_processed(event_id, Utc::now())?;
                tracing::info!(event_id = %event_id, "replayed event processed");
                Ok(Ok(()))
            }
            Err(err) => {
                self.store.mark_failed(event_id, &err.to_string())?;
                tracing::warn!(event_id = %event_id, error = %err, "replayed event failed again");
                Ok(Err(err))
            }
        }
    }

    /// Re-dispatch every unprocessed event, in append order.
    ///
    /// Useful after a dependency resolves (precondition failures) or a code
    /// fix ships (unrecognized types). Events that fail again simply stay
    /// flagged; no ordering within a stream is violated because appends
    /// assigned their versions long ago and dispatch itself is idempotent.
    pub fn replay_unprocessed(&self) -> Result<ReplayReport, StoreError> {
        let mut report = ReplayReport::default();
        for event in self.store.unprocessed()? {
            report.attempted += 1;
            match self.retry(event.id)? {
                Ok(()) => report.processed += 1,
                Err(_) => report.failed += 1,
            }
        }
        Ok(report)
    }
}
