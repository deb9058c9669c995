//! Access-grant projection. Soft-deletes on revocation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use orgspine_auth::AccessWindow;
use orgspine_core::{EventId, GrantId, OrgId, UserId};
use orgspine_domain::grant::GrantEvent;
use orgspine_events::{DispatchError, DomainEvent};

use crate::read_model::ReadModelStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantRow {
    pub grant_id: GrantId,
    pub user_id: UserId,
    pub org_id: OrgId,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub last_event_id: EventId,
}

pub struct AccessGrantsProjection<S> {
    store: S,
}

impl<S> AccessGrantsProjection<S>
where
    S: ReadModelStore<GrantId, GrantRow>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn apply(&self, event: &DomainEvent, payload: &GrantEvent) -> Result<(), DispatchError> {
        match payload {
            GrantEvent::Granted(e) => {
                self.store.upsert(
                    e.grant_id,
                    GrantRow {
                        grant_id: e.grant_id,
                        user_id: e.user_id,
                        org_id: e.org_id,
                        valid_from: e.valid_from,
                        valid_until: e.valid_until,
                        revoked_at: None,
                        last_event_id: event.id,
                    },
                );
            }
            GrantEvent::WindowChanged(e) => {
                let mut row = self.store.get(&e.grant_id).ok_or_else(|| {
                    DispatchError::Precondition(format!("grant {} not projected", e.grant_id))
                })?;
                row.valid_from = e.valid_from;
                row.valid_until = e.valid_until;
                row.last_event_id = event.id;
                self.store.upsert(e.grant_id, row);
            }
            GrantEvent::Revoked(e) => {
                let mut row = self.store.get(&e.grant_id).ok_or_else(|| {
                    DispatchError::Precondition(format!("grant {} not projected", e.grant_id))
                })?;
                row.revoked_at = Some(event.created_at);
                row.last_event_id = event.id;
                self.store.upsert(e.grant_id, row);
            }
        }
        Ok(())
    }

    pub fn get(&self, grant_id: GrantId) -> Option<GrantRow> {
        self.store.get(&grant_id)
    }

    /// The access window claims assembly uses: the first unrevoked grant for
    /// the (user, organization) pair, `None` when no such grant exists.
    pub fn window_for(&self, user_id: UserId, org_id: OrgId) -> Option<AccessWindow> {
        self.store
            .list()
            .into_iter()
            .filter(|g| g.user_id == user_id && g.org_id == org_id && g.revoked_at.is_none())
            .map(|g| AccessWindow {
                valid_from: g.valid_from,
                valid_until: g.valid_until,
            })
            .next()
    }
}
