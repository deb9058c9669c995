//! Event records: the unit of the append-only log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use orgspine_core::EventId;

use crate::metadata::EventMetadata;

/// An event ready to be appended (no id, no version, no timestamps yet).
///
/// The event store assigns `stream_version` during append; `stream_type` is
/// carried in its wire form so that a misconfigured emitter still produces a
/// durable, replayable record (the router rejects it loudly at dispatch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub stream_id: Uuid,
    pub stream_type: String,
    pub event_type: String,
    pub event_data: JsonValue,
    pub metadata: EventMetadata,
}

/// A stored, immutable domain event.
///
/// `processed_at == None` means pending or failed; `processing_error`
/// distinguishes the two. The row itself is never mutated after append except
/// for the processing markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: EventId,
    pub stream_id: Uuid,
    pub stream_type: String,
    /// Strictly increasing position in the stream, assigned by the store.
    pub stream_version: u64,
    pub event_type: String,
    pub event_data: JsonValue,
    pub metadata: EventMetadata,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processing_error: Option<String>,
    pub retry_count: u32,
}

impl DomainEvent {
    /// Pending or failed (not yet reflected in projections).
    pub fn is_unprocessed(&self) -> bool {
        self.processed_at.is_none()
    }

    /// Dispatch failed and the error was recorded for replay.
    pub fn is_failed(&self) -> bool {
        self.processed_at.is_none() && self.processing_error.is_some()
    }
}
