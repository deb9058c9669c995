//! Users projection (identity directory).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgspine_core::{EventId, OrgId, UserId};
use orgspine_domain::user::UserEvent;
use orgspine_events::{DispatchError, DomainEvent};

use crate::read_model::ReadModelStore;

/// User row. Soft-deleted: deactivation stamps `deactivated_at` and keeps the
/// row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: UserId,
    pub organization_id: OrgId,
    pub email: String,
    pub display_name: String,
    pub deactivated_at: Option<DateTime<Utc>>,
    pub last_event_id: EventId,
}

/// Projection maintaining the user directory.
pub struct UsersProjection<S> {
    store: S,
}

impl<S> UsersProjection<S>
where
    S: ReadModelStore<UserId, UserRow>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn apply(&self, event: &DomainEvent, payload: &UserEvent) -> Result<(), DispatchError> {
        match payload {
            UserEvent::Created(e) => {
                self.store.upsert(
                    e.user_id,
                    UserRow {
                        user_id: e.user_id,
                        organization_id: e.organization_id,
                        email: e.email.trim().to_lowercase(),
                        display_name: e.display_name.clone(),
                        deactivated_at: None,
                        last_event_id: event.id,
                    },
                );
            }
            UserEvent::ProfileUpdated(e) => {
                let mut row = self.row(e.user_id)?;
                if let Some(email) = &e.email {
                    row.email = email.trim().to_lowercase();
                }
                if let Some(name) = &e.display_name {
                    row.display_name = name.clone();
                }
                row.last_event_id = event.id;
                self.store.upsert(e.user_id, row);
            }
            UserEvent::Deactivated(e) => {
                let mut row = self.row(e.user_id)?;
                row.deactivated_at = Some(event.created_at);
                row.last_event_id = event.id;
                self.store.upsert(e.user_id, row);
            }
            UserEvent::Reactivated(e) => {
                let mut row = self.row(e.user_id)?;
                row.deactivated_at = None;
                row.last_event_id = event.id;
                self.store.upsert(e.user_id, row);
            }
        }
        Ok(())
    }

    fn row(&self, user_id: UserId) -> Result<UserRow, DispatchError> {
        self.store
            .get(&user_id)
            .ok_or_else(|| DispatchError::Precondition(format!("user {user_id} not projected")))
    }

    pub fn get(&self, user_id: UserId) -> Option<UserRow> {
        self.store.get(&user_id)
    }

    pub fn list(&self) -> Vec<UserRow> {
        self.store.list()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use orgspine_core::Actor;
    use orgspine_domain::TypedEvent;
    use orgspine_domain::user::{UserCreated, UserDeactivated, UserProfileUpdated};
    use orgspine_events::EventMetadata;

    use super::*;
    use crate::read_model::InMemoryReadModelStore;

    fn event_for(payload: &UserEvent) -> DomainEvent {
        DomainEvent {
            id: EventId::new(),
            stream_id: Uuid::now_v7(),
            stream_type: "user".to_string(),
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

    fn projection() -> UsersProjection<Arc<InMemoryReadModelStore<UserId, UserRow>>> {
        UsersProjection::new(Arc::new(InMemoryReadModelStore::new()))
    }

    #[test]
    fn created_then_updated_builds_the_row() {
        let p = projection();
        let user_id = UserId::new();

        let created = UserEvent::Created(UserCreated {
            user_id,
            organization_id: OrgId::new(),
            email: "  Nina@Example.ORG ".into(),
            display_name: "Nina".into(),
        });
        p.apply(&event_for(&created), &created).unwrap();

        let updated = UserEvent::ProfileUpdated(UserProfileUpdated {
            user_id,
            email: None,
            display_name: Some("Nina R.".into()),
        });
        p.apply(&event_for(&updated), &updated).unwrap();

        let row = p.get(user_id).unwrap();
        assert_eq!(row.email, "nina@example.org");
        assert_eq!(row.display_name, "Nina R.");
        assert!(row.deactivated_at.is_none());
    }

    #[test]
    fn update_before_create_is_a_precondition_failure() {
        let p = projection();
        let updated = UserEvent::ProfileUpdated(UserProfileUpdated {
            user_id: UserId::new(),
            email: None,
            display_name: Some("ghost".into()),
        });
        let err = p.apply(&event_for(&updated), &updated).unwrap_err();
        assert!(matches!(err, DispatchError::Precondition(_)));
    }

    #[test]
    fn deactivation_is_soft_and_idempotent() {
        let p = projection();
        let user_id = UserId::new();

        let created = UserEvent::Created(UserCreated {
            user_id,
            organization_id: OrgId::new(),
            email: "a@example.org".into(),
            display_name: "A".into(),
        });
        p.apply(&event_for(&created), &created).unwrap();

        let deactivated = UserEvent::Deactivated(UserDeactivated { user_id });
        let event = event_for(&deactivated);
        p.apply(&event, &deactivated).unwrap();
        let first = p.get(user_id).unwrap();
        assert!(first.deactivated_at.is_some());

        // Same event again: same row.
        p.apply(&event, &deactivated).unwrap();
        assert_eq!(p.get(user_id).unwrap(), first);
    }
}
