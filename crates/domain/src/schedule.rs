//! Operating-schedule aggregate family events.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use orgspine_core::{OrgUnitId, ScheduleId};

use crate::{DecodeError, TypedEvent};

pub const SCHEDULE_DEFINED: &str = "schedule.defined";
pub const SCHEDULE_UPDATED: &str = "schedule.updated";
pub const SCHEDULE_REMOVED: &str = "schedule.removed";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// One opening window on one weekday.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub day: DayOfWeek,
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDefined {
    pub schedule_id: ScheduleId,
    pub unit_id: OrgUnitId,
    pub name: String,
    pub windows: Vec<ScheduleWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleUpdated {
    pub schedule_id: ScheduleId,
    pub windows: Vec<ScheduleWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRemoved {
    pub schedule_id: ScheduleId,
}

/// All schedule events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleEvent {
    Defined(ScheduleDefined),
    Updated(ScheduleUpdated),
    Removed(ScheduleRemoved),
}

impl TypedEvent for ScheduleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ScheduleEvent::Defined(_) => SCHEDULE_DEFINED,
            ScheduleEvent::Updated(_) => SCHEDULE_UPDATED,
            ScheduleEvent::Removed(_) => SCHEDULE_REMOVED,
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let payload = |e| DecodeError::payload(event_type, e);
        match event_type {
            SCHEDULE_DEFINED => serde_json::from_value(data.clone())
                .map(ScheduleEvent::Defined)
                .map_err(payload),
            SCHEDULE_UPDATED => serde_json::from_value(data.clone())
                .map(ScheduleEvent::Updated)
                .map_err(payload),
            SCHEDULE_REMOVED => serde_json::from_value(data.clone())
                .map(ScheduleEvent::Removed)
                .map_err(payload),
            _ => Err(DecodeError::UnknownType(event_type.to_string())),
        }
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            ScheduleEvent::Defined(e) => serde_json::to_value(e),
            ScheduleEvent::Updated(e) => serde_json::to_value(e),
            ScheduleEvent::Removed(e) => serde_json::to_value(e),
        }
    }
}
