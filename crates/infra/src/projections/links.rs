//! Relationship (junction) projection. Hard-deletes on unlink.

use serde::Serialize;
use uuid::Uuid;

use orgspine_core::EventId;
use orgspine_domain::link::{LinkEvent, LinkKind};
use orgspine_events::{DispatchError, DomainEvent};

use crate::read_model::ReadModelStore;

/// Natural key of a junction row: both ends plus the kind.
pub type LinkKey = (Uuid, Uuid, LinkKind);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRow {
    pub left_id: Uuid,
    pub right_id: Uuid,
    pub kind: LinkKind,
    pub last_event_id: EventId,
}

pub struct LinksProjection<S> {
    store: S,
}

impl<S> LinksProjection<S>
where
    S: ReadModelStore<LinkKey, LinkRow>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn apply(&self, event: &DomainEvent, payload: &LinkEvent) -> Result<(), DispatchError> {
        let ends = payload.ends();
        let key = (ends.left_id, ends.right_id, payload.kind());
        match payload {
            LinkEvent::Linked { kind, .. } => {
                self.store.upsert(
                    key,
                    LinkRow {
                        left_id: ends.left_id,
                        right_id: ends.right_id,
                        kind: *kind,
                        last_event_id: event.id,
                    },
                );
            }
            LinkEvent::Unlinked { .. } => {
                self.store.remove(&key);
            }
        }
        Ok(())
    }

    pub fn exists(&self, left_id: Uuid, right_id: Uuid, kind: LinkKind) -> bool {
        self.store.get(&(left_id, right_id, kind)).is_some()
    }

    /// Every row of one junction kind with the given left end.
    pub fn links_from(&self, left_id: Uuid, kind: LinkKind) -> Vec<LinkRow> {
        self.store
            .list()
            .into_iter()
            .filter(|l| l.left_id == left_id && l.kind == kind)
            .collect()
    }
}
