//! Organization-unit aggregate family events (non-root nodes).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use orgspine_core::{OrgId, OrgUnitId, ScopePath};

use crate::{DecodeError, TypedEvent};

pub const UNIT_CREATED: &str = "organization_unit.created";
pub const UNIT_RENAMED: &str = "organization_unit.renamed";
pub const UNIT_MOVED: &str = "organization_unit.moved";
pub const UNIT_DEACTIVATED: &str = "organization_unit.deactivated";
pub const UNIT_REACTIVATED: &str = "organization_unit.reactivated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCreated {
    pub unit_id: OrgUnitId,
    pub org_id: OrgId,
    pub name: String,
    /// Full materialized path, parent path plus one segment.
    pub path: ScopePath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRenamed {
    pub unit_id: OrgUnitId,
    pub name: String,
}

/// Subtree move: the unit (and every descendant) swaps its `from_path` prefix
/// for `to_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMoved {
    pub unit_id: OrgUnitId,
    pub from_path: ScopePath,
    pub to_path: ScopePath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDeactivated {
    pub unit_id: OrgUnitId,
    /// Audit-only; the projection recomputes from path containment.
    pub affected_units: Vec<OrgUnitId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReactivated {
    pub unit_id: OrgUnitId,
    pub affected_units: Vec<OrgUnitId>,
}

/// All organization-unit events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitEvent {
    Created(UnitCreated),
    Renamed(UnitRenamed),
    Moved(UnitMoved),
    Deactivated(UnitDeactivated),
    Reactivated(UnitReactivated),
}

impl TypedEvent for UnitEvent {
    fn event_type(&self) -> &'static str {
        match self {
            UnitEvent::Created(_) => UNIT_CREATED,
            UnitEvent::Renamed(_) => UNIT_RENAMED,
            UnitEvent::Moved(_) => UNIT_MOVED,
            UnitEvent::Deactivated(_) => UNIT_DEACTIVATED,
            UnitEvent::Reactivated(_) => UNIT_REACTIVATED,
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let payload = |e| DecodeError::payload(event_type, e);
        match event_type {
            UNIT_CREATED => serde_json::from_value(data.clone())
                .map(UnitEvent::Created)
                .map_err(payload),
            UNIT_RENAMED => serde_json::from_value(data.clone())
                .map(UnitEvent::Renamed)
                .map_err(payload),
            UNIT_MOVED => serde_json::from_value(data.clone())
                .map(UnitEvent::Moved)
                .map_err(payload),
            UNIT_DEACTIVATED => serde_json::from_value(data.clone())
                .map(UnitEvent::Deactivated)
                .map_err(payload),
            UNIT_REACTIVATED => serde_json::from_value(data.clone())
                .map(UnitEvent::Reactivated)
                .map_err(payload),
            _ => Err(DecodeError::UnknownType(event_type.to_string())),
        }
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            UnitEvent::Created(e) => serde_json::to_value(e),
            UnitEvent::Renamed(e) => serde_json::to_value(e),
            UnitEvent::Moved(e) => serde_json::to_value(e),
            UnitEvent::Deactivated(e) => serde_json::to_value(e),
            UnitEvent::Reactivated(e) => serde_json::to_value(e),
        }
    }
}
