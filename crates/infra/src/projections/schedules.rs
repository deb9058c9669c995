//! Operating-schedule projection. Hard-deletes on removal.

use serde::Serialize;

use orgspine_core::{EventId, OrgUnitId, ScheduleId};
use orgspine_domain::schedule::{ScheduleEvent, ScheduleWindow};
use orgspine_events::{DispatchError, DomainEvent};

use crate::read_model::ReadModelStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub schedule_id: ScheduleId,
    pub unit_id: OrgUnitId,
    pub name: String,
    pub windows: Vec<ScheduleWindow>,
    pub last_event_id: EventId,
}

pub struct SchedulesProjection<S> {
    store: S,
}

impl<S> SchedulesProjection<S>
where
    S: ReadModelStore<ScheduleId, ScheduleRow>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn apply(&self, event: &DomainEvent, payload: &ScheduleEvent) -> Result<(), DispatchError> {
        match payload {
            ScheduleEvent::Defined(e) => {
                self.store.upsert(
                    e.schedule_id,
                    ScheduleRow {
                        schedule_id: e.schedule_id,
                        unit_id: e.unit_id,
                        name: e.name.clone(),
                        windows: e.windows.clone(),
                        last_event_id: event.id,
                    },
                );
            }
            ScheduleEvent::Updated(e) => {
                let mut row = self.store.get(&e.schedule_id).ok_or_else(|| {
                    DispatchError::Precondition(format!(
                        "schedule {} not projected",
                        e.schedule_id
                    ))
                })?;
                row.windows = e.windows.clone();
                row.last_event_id = event.id;
                self.store.upsert(e.schedule_id, row);
            }
            ScheduleEvent::Removed(e) => {
                self.store.remove(&e.schedule_id);
            }
        }
        Ok(())
    }

    pub fn get(&self, schedule_id: ScheduleId) -> Option<ScheduleRow> {
        self.store.get(&schedule_id)
    }

    pub fn for_unit(&self, unit_id: OrgUnitId) -> Vec<ScheduleRow> {
        self.store
            .list()
            .into_iter()
            .filter(|s| s.unit_id == unit_id)
            .collect()
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

    use orgspine_core::{Actor, EventId, UserId};
    use orgspine_domain::TypedEvent;
    use orgspine_domain::schedule::{
        DayOfWeek, ScheduleDefined, ScheduleRemoved, ScheduleUpdated,
    };
    use orgspine_events::EventMetadata;

    use super::*;
    use crate::read_model::InMemoryReadModelStore;

    fn event_for(payload: &ScheduleEvent) -> DomainEvent {
        DomainEvent {
            id: EventId::new(),
            stream_id: Uuid::now_v7(),
            stream_type: "schedule".to_string(),
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

    fn window(day: DayOfWeek, opens: &str, closes: &str) -> ScheduleWindow {
        ScheduleWindow {
            day,
            opens: opens.parse().unwrap(),
            closes: closes.parse().unwrap(),
        }
    }

    #[test]
    fn define_update_remove_lifecycle() {
        let p = SchedulesProjection::new(Arc::new(InMemoryReadModelStore::new()));
        let schedule_id = ScheduleId::new();
        let unit_id = OrgUnitId::new();

        let defined = ScheduleEvent::Defined(ScheduleDefined {
            schedule_id,
            unit_id,
            name: "day shift".into(),
            windows: vec![window(DayOfWeek::Monday, "08:00:00", "17:00:00")],
        });
        p.apply(&event_for(&defined), &defined).unwrap();
        assert_eq!(p.for_unit(unit_id).len(), 1);

        let updated = ScheduleEvent::Updated(ScheduleUpdated {
            schedule_id,
            windows: vec![
                window(DayOfWeek::Monday, "08:00:00", "12:00:00"),
                window(DayOfWeek::Tuesday, "08:00:00", "12:00:00"),
            ],
        });
        p.apply(&event_for(&updated), &updated).unwrap();
        assert_eq!(p.get(schedule_id).unwrap().windows.len(), 2);

        // Removal is a hard delete, idempotent on replay.
        let removed = ScheduleEvent::Removed(ScheduleRemoved { schedule_id });
        let event = event_for(&removed);
        p.apply(&event, &removed).unwrap();
        p.apply(&event, &removed).unwrap();
        assert!(p.get(schedule_id).is_none());
    }

    #[test]
    fn update_before_define_is_a_precondition_failure() {
        let p = SchedulesProjection::new(Arc::new(InMemoryReadModelStore::new()));
        let updated = ScheduleEvent::Updated(ScheduleUpdated {
            schedule_id: ScheduleId::new(),
            windows: vec![],
        });
        let err = p.apply(&event_for(&updated), &updated).unwrap_err();
        assert!(matches!(err, DispatchError::Precondition(_)));
    }
}
