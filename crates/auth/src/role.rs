//! Role definitions.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgspine_core::{OrgId, RoleId, ScopePath};

use crate::permission::Permission;

/// A named bundle of permissions with an optional reach limit.
///
/// `scope_bound` caps how far down the hierarchy the role can ever be
/// exercised; absence means the role is unrestricted (global). Roles are
/// soft-deleted: a deleted role stops contributing to effective permissions
/// but its row is retained for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDef {
    pub id: RoleId,
    pub organization_id: OrgId,
    pub name: String,
    pub permissions: HashSet<Permission>,
    pub scope_bound: Option<ScopePath>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RoleDef {
    pub fn new(id: RoleId, organization_id: OrgId, name: impl Into<String>) -> Self {
        Self {
            id,
            organization_id,
            name: name.into(),
            permissions: HashSet::new(),
            scope_bound: None,
            deleted_at: None,
        }
    }

    pub fn with_scope_bound(mut self, bound: ScopePath) -> Self {
        self.scope_bound = Some(bound);
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
