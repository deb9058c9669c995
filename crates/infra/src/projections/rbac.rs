//! Role/permission/assignment projection.
//!
//! Roles soft-delete (`deleted_at` retained for audit); assignments
//! hard-delete on revocation - callers must not assume one discipline applies
//! to both. The rows double as the scope engine's inputs: `effective_for`
//! feeds them straight into `orgspine_auth::effective_permissions`.

use chrono::NaiveDate;
use serde::Serialize;

use orgspine_auth::{Assignment, EffectivePermission, RoleDef, effective_permissions};
use orgspine_core::{AssignmentId, EventId, OrgId, RoleId, UserId};
use orgspine_domain::rbac::RbacEvent;
use orgspine_events::{DispatchError, DomainEvent};

use crate::read_model::ReadModelStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRow {
    pub def: RoleDef,
    pub last_event_id: EventId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    pub assignment: Assignment,
    pub last_event_id: EventId,
}

/// Projection maintaining roles and their assignments.
pub struct RbacProjection<R, A> {
    roles: R,
    assignments: A,
}

impl<R, A> RbacProjection<R, A>
where
    R: ReadModelStore<RoleId, RoleRow>,
    A: ReadModelStore<AssignmentId, AssignmentRow>,
{
    pub fn new(roles: R, assignments: A) -> Self {
        Self { roles, assignments }
    }

    pub fn apply(&self, event: &DomainEvent, payload: &RbacEvent) -> Result<(), DispatchError> {
        match payload {
            RbacEvent::RoleCreated(e) => {
                let mut def = RoleDef::new(e.role_id, e.org_id, e.name.clone());
                def.scope_bound = e.scope_bound.clone();
                self.roles.upsert(
                    e.role_id,
                    RoleRow {
                        def,
                        last_event_id: event.id,
                    },
                );
            }
            RbacEvent::RoleRenamed(e) => {
                let mut row = self.role_row(e.role_id)?;
                row.def.name = e.name.clone();
                row.last_event_id = event.id;
                self.roles.upsert(e.role_id, row);
            }
            RbacEvent::RoleDeleted(e) => {
                let mut row = self.role_row(e.role_id)?;
                row.def.deleted_at = Some(event.created_at);
                row.last_event_id = event.id;
                self.roles.upsert(e.role_id, row);
            }
            RbacEvent::PermissionLinked(e) => {
                let mut row = self.role_row(e.role_id)?;
                row.def.permissions.insert(e.permission.clone());
                row.last_event_id = event.id;
                self.roles.upsert(e.role_id, row);
            }
            RbacEvent::PermissionUnlinked(e) => {
                let mut row = self.role_row(e.role_id)?;
                row.def.permissions.remove(&e.permission);
                row.last_event_id = event.id;
                self.roles.upsert(e.role_id, row);
            }
            RbacEvent::Assigned(e) => {
                if self.roles.get(&e.role_id).is_none() {
                    return Err(DispatchError::Precondition(format!(
                        "role {} not projected",
                        e.role_id
                    )));
                }
                self.assignments.upsert(
                    e.assignment_id,
                    AssignmentRow {
                        assignment: Assignment {
                            id: e.assignment_id,
                            user_id: e.user_id,
                            role_id: e.role_id,
                            organization_id: e.org_id,
                            scope: e.scope.clone(),
                            valid_from: e.valid_from,
                            valid_until: e.valid_until,
                        },
                        last_event_id: event.id,
                    },
                );
            }
            RbacEvent::Unassigned(e) => {
                // Hard delete; removing an already-removed row is a no-op.
                self.assignments.remove(&e.assignment_id);
            }
        }
        Ok(())
    }

    fn role_row(&self, role_id: RoleId) -> Result<RoleRow, DispatchError> {
        self.roles
            .get(&role_id)
            .ok_or_else(|| DispatchError::Precondition(format!("role {role_id} not projected")))
    }

    pub fn role(&self, role_id: RoleId) -> Option<RoleDef> {
        self.roles.get(&role_id).map(|r| r.def)
    }

    pub fn assignment(&self, id: AssignmentId) -> Option<Assignment> {
        self.assignments.get(&id).map(|r| r.assignment)
    }

    pub fn assignments_for(&self, user_id: UserId, org_id: OrgId) -> Vec<Assignment> {
        self.assignments
            .list()
            .into_iter()
            .map(|r| r.assignment)
            .filter(|a| a.user_id == user_id && a.organization_id == org_id)
            .collect()
    }

    /// Effective `{permission, scope}` set for a user on `today`.
    pub fn effective_for(
        &self,
        user_id: UserId,
        org_id: OrgId,
        today: NaiveDate,
    ) -> Vec<EffectivePermission> {
        let assignments = self.assignments_for(user_id, org_id);
        let roles: Vec<RoleDef> = assignments
            .iter()
            .filter_map(|a| self.role(a.role_id))
            .collect();
        effective_permissions(
            &assignments,
            |id| roles.iter().find(|r| r.id == id),
            today,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
