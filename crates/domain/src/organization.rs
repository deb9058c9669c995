//! Organization aggregate family events (root nodes of the hierarchy).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use orgspine_core::{OrgId, OrgKind, OrgUnitId, ScopePath};

use crate::{DecodeError, TypedEvent};

pub const ORG_CREATED: &str = "organization.created";
pub const ORG_RENAMED: &str = "organization.renamed";
pub const ORG_SETTINGS_UPDATED: &str = "organization.settings_updated";
pub const ORG_DEACTIVATED: &str = "organization.deactivated";
pub const ORG_REACTIVATED: &str = "organization.reactivated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationCreated {
    pub org_id: OrgId,
    pub name: String,
    pub kind: OrgKind,
    /// Root path of the new organization (single segment).
    pub path: ScopePath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRenamed {
    pub org_id: OrgId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSettingsUpdated {
    pub org_id: OrgId,
    pub settings: JsonValue,
}

/// Cascading deactivation of an organization and its whole subtree.
///
/// `affected_units` is captured at emission time for audit and notification
/// fan-out only. The projection recomputes the affected set from current path
/// containment, so processing stays correct even if the tree changed between
/// emission and (re)dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDeactivated {
    pub org_id: OrgId,
    pub affected_units: Vec<OrgUnitId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationReactivated {
    pub org_id: OrgId,
    pub affected_units: Vec<OrgUnitId>,
}

/// All organization events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationEvent {
    Created(OrganizationCreated),
    Renamed(OrganizationRenamed),
    SettingsUpdated(OrganizationSettingsUpdated),
    Deactivated(OrganizationDeactivated),
    Reactivated(OrganizationReactivated),
}

impl TypedEvent for OrganizationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrganizationEvent::Created(_) => ORG_CREATED,
            OrganizationEvent::Renamed(_) => ORG_RENAMED,
            OrganizationEvent::SettingsUpdated(_) => ORG_SETTINGS_UPDATED,
            OrganizationEvent::Deactivated(_) => ORG_DEACTIVATED,
            OrganizationEvent::Reactivated(_) => ORG_REACTIVATED,
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let payload = |e| DecodeError::payload(event_type, e);
        match event_type {
            ORG_CREATED => serde_json::from_value(data.clone())
                .map(OrganizationEvent::Created)
                .map_err(payload),
            ORG_RENAMED => serde_json::from_value(data.clone())
                .map(OrganizationEvent::Renamed)
                .map_err(payload),
            ORG_SETTINGS_UPDATED => serde_json::from_value(data.clone())
                .map(OrganizationEvent::SettingsUpdated)
                .map_err(payload),
            ORG_DEACTIVATED => serde_json::from_value(data.clone())
                .map(OrganizationEvent::Deactivated)
                .map_err(payload),
            ORG_REACTIVATED => serde_json::from_value(data.clone())
                .map(OrganizationEvent::Reactivated)
                .map_err(payload),
            _ => Err(DecodeError::UnknownType(event_type.to_string())),
        }
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            OrganizationEvent::Created(e) => serde_json::to_value(e),
            OrganizationEvent::Renamed(e) => serde_json::to_value(e),
            OrganizationEvent::SettingsUpdated(e) => serde_json::to_value(e),
            OrganizationEvent::Deactivated(e) => serde_json::to_value(e),
            OrganizationEvent::Reactivated(e) => serde_json::to_value(e),
        }
    }
}
