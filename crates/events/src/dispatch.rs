//! Dispatch seam between the event log and the projection layer.

use std::sync::Arc;

use thiserror::Error;

use crate::record::DomainEvent;

/// Why an event could not be applied to projections.
///
/// Every variant leaves the event durably stored and unprocessed with the
/// error recorded on the row. Unknown streams/types are configuration bugs and
/// stay failed until a code fix ships and an operator replays them; a
/// precondition failure resolves itself once the dependency is projected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The stream family string is not one this deployment knows.
    #[error("unrecognized stream type '{0}'")]
    UnrecognizedStream(String),

    /// Known family, unknown event type - never silently skipped.
    #[error("unrecognized event type '{event_type}' for stream '{stream_type}'")]
    UnrecognizedEventType {
        stream_type: String,
        event_type: String,
    },

    /// The payload did not deserialize into the family's typed event.
    #[error("malformed payload: {0}")]
    Payload(String),

    /// A handler found referenced data missing (e.g. parent not yet
    /// projected). The event stays unprocessed and succeeds on replay once
    /// the dependency resolves.
    #[error("projection precondition: {0}")]
    Precondition(String),

    /// The handler itself failed. The append is never rolled back; the event
    /// keeps its durable row and the error is recorded for replay.
    #[error("handler failed: {0}")]
    Handler(String),
}

impl DispatchError {
    /// True when a plain replay can succeed without a code change.
    pub fn is_replayable_as_is(&self) -> bool {
        matches!(self, DispatchError::Precondition(_))
    }
}

/// Applies one stored event to the projection layer.
///
/// Implementations route by stream family and event type, and must be
/// idempotent: dispatching the same event twice leaves projections unchanged
/// after the first success.
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, event: &DomainEvent) -> Result<(), DispatchError>;
}

impl<D> EventDispatcher for Arc<D>
where
    D: EventDispatcher + ?Sized,
{
    fn dispatch(&self, event: &DomainEvent) -> Result<(), DispatchError> {
        (**self).dispatch(event)
    }
}
