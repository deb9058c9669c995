//! Append-only event store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use orgspine_core::{EventId, ExpectedVersion};

use crate::record::{DomainEvent, NewEvent};

/// Event store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Optimistic concurrency check failed (stream head moved).
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("event {0} not found")]
    NotFound(EventId),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Append-only, versioned event log.
///
/// Version assignment happens **inside** `append`, under the store's write
/// section: read-head, assign, insert is one critical section, so two
/// concurrent emitters on the same stream can never be handed the same
/// version. `ExpectedVersion::Exact` additionally gives callers a
/// compare-and-swap primitive for cross-process retry loops.
pub trait EventStore: Send + Sync {
    /// Append one event, assigning `stream_version = head + 1`.
    fn append(&self, event: NewEvent, expected: ExpectedVersion)
        -> Result<DomainEvent, StoreError>;

    fn get(&self, id: EventId) -> Result<DomainEvent, StoreError>;

    /// Full stream in version order.
    fn load_stream(&self, stream_id: Uuid, stream_type: &str)
        -> Result<Vec<DomainEvent>, StoreError>;

    /// All events with `processed_at` null, in append order.
    fn unprocessed(&self) -> Result<Vec<DomainEvent>, StoreError>;

    /// Record successful dispatch.
    fn mark_processed(&self, id: EventId, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Record a dispatch failure and bump the retry counter.
    fn mark_failed(&self, id: EventId, error: &str) -> Result<(), StoreError>;

    /// Operator action: clear the recorded failure so the event can be
    /// re-dispatched.
    fn clear_failure(&self, id: EventId) -> Result<(), StoreError>;
}

impl<S> EventStore for Arc<S>
where
    S: EventStore + ?Sized,
{
    fn append(
        &self,
        event: NewEvent,
        expected: ExpectedVersion,
    ) -> Result<DomainEvent, StoreError> {
        (**self).append(event, expected)
    }

    fn get(&self, id: EventId) -> Result<DomainEvent, StoreError> {
        (**self).get(id)
    }

    fn load_stream(
        &self,
        stream_id: Uuid,
        stream_type: &str,
    ) -> Result<Vec<DomainEvent>, StoreError> {
        (**self).load_stream(stream_id, stream_type)
    }

    fn unprocessed(&self) -> Result<Vec<DomainEvent>, StoreError> {
        (**self).unprocessed()
    }

    fn mark_processed(&self, id: EventId, at: DateTime<Utc>) -> Result<(), StoreError> {
        (**self).mark_processed(id, at)
    }

    fn mark_failed(&self, id: EventId, error: &str) -> Result<(), StoreError> {
        (**self).mark_failed(id, error)
    }

    fn clear_failure(&self, id: EventId) -> Result<(), StoreError> {
        (**self).clear_failure(id)
    }
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<DomainEvent>,
    index: HashMap<EventId, usize>,
    /// Stream head versions, keyed by (stream_id, stream_type wire form).
    heads: HashMap<(Uuid, String), u64>,
}

/// In-memory append-only event store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: RwLock<Inner>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the full log in append order (test/replay tooling).
    pub fn all(&self) -> Result<Vec<DomainEvent>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.events.clone())
    }
}

impl EventStore for InMemoryEventStore {
    fn append(
        &self,
        event: NewEvent,
        expected: ExpectedVersion,
    ) -> Result<DomainEvent, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        let key = (event.stream_id, event.stream_type.clone());
        let head = inner.heads.get(&key).copied().unwrap_or(0);

        if !expected.matches(head) {
            return Err(StoreError::Conflict(format!(
                "stream {}/{}: expected {expected:?}, found {head}",
                event.stream_id, event.stream_type
            )));
        }

        let stored = DomainEvent {
            id: EventId::new(),
            stream_id: event.stream_id,
            stream_type: event.stream_type,
            stream_version: head + 1,
            event_type: event.event_type,
            event_data: event.event_data,
            metadata: event.metadata,
            created_at: Utc::now(),
            processed_at: None,
            processing_error: None,
            retry_count: 0,
        };

        inner.heads.insert(key, stored.stream_version);
        let idx = inner.events.len();
        inner.index.insert(stored.id, idx);
        inner.events.push(stored.clone());

        Ok(stored)
    }

    fn get(&self, id: EventId) -> Result<DomainEvent, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        inner
            .index
            .get(&id)
            .map(|&idx| inner.events[idx].clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn load_stream(
        &self,
        stream_id: Uuid,
        stream_type: &str,
    ) -> Result<Vec<DomainEvent>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut events: Vec<DomainEvent> = inner
            .events
            .iter()
            .filter(|e| e.stream_id == stream_id && e.stream_type == stream_type)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.stream_version);
        Ok(events)
    }

    fn unprocessed(&self) -> Result<Vec<DomainEvent>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .events
            .iter()
            .filter(|e| e.processed_at.is_none())
            .cloned()
            .collect())
    }

    fn mark_processed(&self, id: EventId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let idx = *inner.index.get(&id).ok_or(StoreError::NotFound(id))?;
        let event = &mut inner.events[idx];
        event.processed_at = Some(at);
        event.processing_error = None;
        Ok(())
    }

    fn mark_failed(&self, id: EventId, error: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let idx = *inner.index.get(&id).ok_or(StoreError::NotFound(id))?;
        let event = &mut inner.events[idx];
        event.processed_at = None;
        event.processing_error = Some(error.to_string());
        event.retry_count += 1;
        Ok(())
    }

    fn clear_failure(&self, id: EventId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let idx = *inner.index.get(&id).ok_or(StoreError::NotFound(id))?;
        inner.events[idx].processing_error = None;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
