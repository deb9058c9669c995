//! Role/permission aggregate family events.
//!
//! `role.permission.linked`/`.unlinked` *look* like relationship events but
//! mutate the role's own projection; the dispatch router carries them on an
//! explicit carve-out list so they land here instead of the relationship
//! sub-router.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use orgspine_auth::Permission;
use orgspine_core::{AssignmentId, OrgId, RoleId, ScopePath, UserId};

use crate::{DecodeError, TypedEvent};

pub const ROLE_CREATED: &str = "role.created";
pub const ROLE_RENAMED: &str = "role.renamed";
pub const ROLE_DELETED: &str = "role.deleted";
pub const ROLE_PERMISSION_LINKED: &str = "role.permission.linked";
pub const ROLE_PERMISSION_UNLINKED: &str = "role.permission.unlinked";
pub const ROLE_ASSIGNED: &str = "role.assigned";
pub const ROLE_UNASSIGNED: &str = "role.unassigned";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCreated {
    pub role_id: RoleId,
    pub org_id: OrgId,
    pub name: String,
    pub scope_bound: Option<ScopePath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRenamed {
    pub role_id: RoleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDeleted {
    pub role_id: RoleId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionLinked {
    pub role_id: RoleId,
    pub permission: Permission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionUnlinked {
    pub role_id: RoleId,
    pub permission: Permission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssigned {
    pub assignment_id: AssignmentId,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub org_id: OrgId,
    pub scope: Option<ScopePath>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUnassigned {
    pub assignment_id: AssignmentId,
}

/// All role/permission events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RbacEvent {
    RoleCreated(RoleCreated),
    RoleRenamed(RoleRenamed),
    RoleDeleted(RoleDeleted),
    PermissionLinked(RolePermissionLinked),
    PermissionUnlinked(RolePermissionUnlinked),
    Assigned(RoleAssigned),
    Unassigned(RoleUnassigned),
}

impl TypedEvent for RbacEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RbacEvent::RoleCreated(_) => ROLE_CREATED,
            RbacEvent::RoleRenamed(_) => ROLE_RENAMED,
            RbacEvent::RoleDeleted(_) => ROLE_DELETED,
            RbacEvent::PermissionLinked(_) => ROLE_PERMISSION_LINKED,
            RbacEvent::PermissionUnlinked(_) => ROLE_PERMISSION_UNLINKED,
            RbacEvent::Assigned(_) => ROLE_ASSIGNED,
            RbacEvent::Unassigned(_) => ROLE_UNASSIGNED,
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let payload = |e| DecodeError::payload(event_type, e);
        match event_type {
            ROLE_CREATED => serde_json::from_value(data.clone())
                .map(RbacEvent::RoleCreated)
                .map_err(payload),
            ROLE_RENAMED => serde_json::from_value(data.clone())
                .map(RbacEvent::RoleRenamed)
                .map_err(payload),
            ROLE_DELETED => serde_json::from_value(data.clone())
                .map(RbacEvent::RoleDeleted)
                .map_err(payload),
            ROLE_PERMISSION_LINKED => serde_json::from_value(data.clone())
                .map(RbacEvent::PermissionLinked)
                .map_err(payload),
            ROLE_PERMISSION_UNLINKED => serde_json::from_value(data.clone())
                .map(RbacEvent::PermissionUnlinked)
                .map_err(payload),
            ROLE_ASSIGNED => serde_json::from_value(data.clone())
                .map(RbacEvent::Assigned)
                .map_err(payload),
            ROLE_UNASSIGNED => serde_json::from_value(data.clone())
                .map(RbacEvent::Unassigned)
                .map_err(payload),
            _ => Err(DecodeError::UnknownType(event_type.to_string())),
        }
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            RbacEvent::RoleCreated(e) => serde_json::to_value(e),
            RbacEvent::RoleRenamed(e) => serde_json::to_value(e),
            RbacEvent::RoleDeleted(e) => serde_json::to_value(e),
            RbacEvent::PermissionLinked(e) => serde_json::to_value(e),
            RbacEvent::PermissionUnlinked(e) => serde_json::to_value(e),
            RbacEvent::Assigned(e) => serde_json::to_value(e),
            RbacEvent::Unassigned(e) => serde_json::to_value(e),
        }
    }
}
