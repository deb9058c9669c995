//! Emission API: validate, append, dispatch - one unit of work.

use chrono::Utc;
use serde_json::Value as JsonValue;
use thiserror::Error;
use uuid::Uuid;

use orgspine_core::{DomainError, EventId, ExpectedVersion};

use crate::dispatch::{DispatchError, EventDispatcher};
use crate::metadata::EventMetadata;
use crate::notify::{NOTIFIED_EVENT_TYPES, Notification, NotificationChannel};
use crate::record::NewEvent;
use crate::store::{EventStore, StoreError};

/// Emission failure - nothing durable happened.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Structural precondition rejected before any append.
    #[error("emission rejected: {0}")]
    Validation(#[from] DomainError),

    /// The append itself failed (e.g. optimistic concurrency conflict).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the emitter's caller observes for a committed event.
///
/// There is no third state: an appended event is either processed or durably
/// flagged with a recorded error awaiting replay - never silently lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    Processed,
    Flagged(DispatchError),
}

/// Receipt for a committed emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReceipt {
    pub event_id: EventId,
    pub stream_version: u64,
    pub outcome: EmitOutcome,
}

/// The write entry point of the engine.
///
/// `emit` validates structural preconditions, appends with the next stream
/// version, then synchronously dispatches to the projection layer in the same
/// unit of work. The emitter never mutates projections directly - that is the
/// dispatcher's job.
pub struct Emitter<S, D, N> {
    store: S,
    dispatcher: D,
    notifier: N,
}

impl<S, D, N> Emitter<S, D, N>
where
    S: EventStore,
    D: EventDispatcher,
    N: NotificationChannel,
{
    pub fn new(store: S, dispatcher: D, notifier: N) -> Self {
        Self {
            store,
            dispatcher,
            notifier,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append and dispatch one event.
    pub fn emit(
        &self,
        stream_id: Uuid,
        stream_type: &str,
        event_type: &str,
        data: JsonValue,
        metadata: EventMetadata,
    ) -> Result<EmitReceipt, EmitError> {
        self.emit_with_expected(
            stream_id,
            stream_type,
            event_type,
            data,
            metadata,
            ExpectedVersion::Any,
        )
    }

    /// Append with an optimistic concurrency expectation, then dispatch.
    pub fn emit_with_expected(
        &self,
        stream_id: Uuid,
        stream_type: &str,
        event_type: &str,
        data: JsonValue,
        metadata: EventMetadata,
        expected: ExpectedVersion,
    ) -> Result<EmitReceipt, EmitError> {
        if event_type.is_empty() || !event_type.contains('.') {
            return Err(DomainError::validation(format!(
                "event type '{event_type}' must be a dotted name"
            ))
            .into());
        }
        metadata.validate_for(event_type)?;

        let event = self.store.append(
            NewEvent {
                stream_id,
                stream_type: stream_type.to_string(),
                event_type: event_type.to_string(),
                event_data: data,
                metadata,
            },
            expected,
        )?;

        let outcome = match self.dispatcher.dispatch(&event) {
            Ok(()) => {
                self.store.mark_processed(event.id, Utc::now())?;
                if NOTIFIED_EVENT_TYPES.contains(&event.event_type.as_str()) {
                    self.notifier.publish(Notification::for_event(&event));
                }
                tracing::debug!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    stream_version = event.stream_version,
                    "event processed"
                );
                EmitOutcome::Processed
            }
            Err(err) => {
                self.store.mark_failed(event.id, &err.to_string())?;
                tracing::warn!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    error = %err,
                    "event flagged for replay"
                );
                EmitOutcome::Flagged(err)
            }
        };

        Ok(EmitReceipt {
            event_id: event.id,
            stream_version: event.stream_version,
            outcome,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
