//! Active impersonation sessions. Hard-deletes when a session ends.

use chrono::{DateTime, Utc};
use serde::Serialize;

use orgspine_core::{EventId, SessionId, UserId};
use orgspine_domain::impersonation::ImpersonationEvent;
use orgspine_events::{DispatchError, DomainEvent};

use crate::read_model::ReadModelStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpersonationRow {
    pub session_id: SessionId,
    pub admin_id: UserId,
    pub target_user_id: UserId,
    pub started_at: DateTime<Utc>,
    pub last_event_id: EventId,
}

pub struct ImpersonationProjection<S> {
    store: S,
}

impl<S> ImpersonationProjection<S>
where
    S: ReadModelStore<SessionId, ImpersonationRow>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn apply(
        &self,
        event: &DomainEvent,
        payload: &ImpersonationEvent,
    ) -> Result<(), DispatchError> {
        match payload {
            ImpersonationEvent::Started(e) => {
                self.store.upsert(
                    e.session_id,
                    ImpersonationRow {
                        session_id: e.session_id,
                        admin_id: e.admin_id,
                        target_user_id: e.target_user_id,
                        started_at: event.created_at,
                        last_event_id: event.id,
                    },
                );
            }
            ImpersonationEvent::Ended(e) => {
                // A session that never projected (or already ended) is fine.
                self.store.remove(&e.session_id);
            }
        }
        Ok(())
    }

    pub fn get(&self, session_id: SessionId) -> Option<ImpersonationRow> {
        self.store.get(&session_id)
    }

    pub fn active(&self) -> Vec<ImpersonationRow> {
        self.store.list()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use orgspine_core::Actor;
    use orgspine_domain::TypedEvent;
    use orgspine_domain::impersonation::{ImpersonationEnded, ImpersonationStarted};
    use orgspine_events::EventMetadata;

    use super::*;
    use crate::read_model::InMemoryReadModelStore;

    fn event_for(payload: &ImpersonationEvent) -> DomainEvent {
        DomainEvent {
            id: EventId::new(),
            stream_id: Uuid::now_v7(),
            stream_type: "impersonation".to_string(),
            stream_version: 1,
            event_type: payload.event_type().to_string(),
            event_data: payload.to_data().unwrap(),
            metadata: EventMetadata::new(Actor::user(UserId::new())),
            created_at: Utc::now(),
            processed_at: None,
            processing_error: None,
            retry_count: 0,
        }
    }

    #[test]
    fn session_appears_while_running_and_vanishes_on_end() {
        let p = ImpersonationProjection::new(Arc::new(InMemoryReadModelStore::new()));
        let session_id = SessionId::new();

        let started = ImpersonationEvent::Started(ImpersonationStarted {
            session_id,
            admin_id: UserId::new(),
            target_user_id: UserId::new(),
        });
        p.apply(&event_for(&started), &started).unwrap();
        assert_eq!(p.active().len(), 1);

        let ended = ImpersonationEvent::Ended(ImpersonationEnded { session_id });
        let event = event_for(&ended);
        p.apply(&event, &ended).unwrap();
        assert!(p.get(session_id).is_none());
        // Ending twice (duplicate delivery) is a no-op.
        p.apply(&event, &ended).unwrap();
        assert!(p.active().is_empty());
    }
}
