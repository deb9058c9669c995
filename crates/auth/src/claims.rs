//! Claims assembly: the per-session authorization context.
//!
//! Assembled once per session establishment; role or permission changes take
//! effect on the next recomputation (an explicit staleness window, not a bug).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use orgspine_core::{OrgId, OrgKind, RoleId, UserId};

use crate::assignment::Assignment;
use crate::engine::{EffectivePermission, effective_permissions};
use crate::role::RoleDef;

/// Organization context a session is established against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationContext {
    pub organization_id: OrgId,
    pub kind: OrgKind,
}

/// A principal's access window for an organization (inclusive dates).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessWindow {
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl AccessWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.valid_from.is_none_or(|from| date >= from)
            && self.valid_until.is_none_or(|until| date <= until)
    }
}

/// The authorization payload attached to a session.
///
/// When `blocked` is set the principal's access window for this organization
/// has not started, has ended, or no grant exists at all: the permission list
/// is empty and must not be trusted for anything. Callers check `blocked`
/// before consulting `permissions` - the degraded branch is a field, not an
/// error path that can be forgotten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub user_id: UserId,
    pub organization_id: OrgId,
    pub organization_kind: OrgKind,
    pub permissions: Vec<EffectivePermission>,
    pub blocked: bool,
}

impl Claims {
    /// The minimal, explicitly blocked payload.
    pub fn blocked(user_id: UserId, org: OrganizationContext) -> Self {
        Self {
            user_id,
            organization_id: org.organization_id,
            organization_kind: org.kind,
            permissions: Vec::new(),
            blocked: true,
        }
    }
}

/// Build the claims for a principal in an organization context.
///
/// `window` is the principal's access grant for the organization; `None`
/// means no grant exists, which degrades to the blocked payload exactly like
/// an out-of-window grant does.
pub fn assemble<'a, F>(
    user_id: UserId,
    org: OrganizationContext,
    window: Option<AccessWindow>,
    assignments: &[Assignment],
    role_lookup: F,
    today: NaiveDate,
) -> Claims
where
    F: Fn(RoleId) -> Option<&'a RoleDef>,
{
    let in_window = window.is_some_and(|w| w.contains(today));
    if !in_window {
        return Claims::blocked(user_id, org);
    }

    let relevant: Vec<Assignment> = assignments
        .iter()
        .filter(|a| a.user_id == user_id && a.organization_id == org.organization_id)
        .cloned()
        .collect();

    Claims {
        user_id,
        organization_id: org.organization_id,
        organization_kind: org.kind,
        permissions: effective_permissions(&relevant, role_lookup, today),
        blocked: false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use orgspine_core::AssignmentId;

    use super::*;
    use crate::permission::Permission;

    fn today() -> NaiveDate {
        "2026-08-07".parse().unwrap()
    }

    fn open_window() -> Option<AccessWindow> {
        Some(AccessWindow {
            valid_from: None,
            valid_until: None,
        })
    }

    struct Fixture {
        user: UserId,
        org: OrganizationContext,
        role: RoleDef,
        assignments: Vec<Assignment>,
    }

    impl Fixture {
        fn new() -> Self {
            let org_id = OrgId::new();
            let role = RoleDef::new(RoleId::new(), org_id, "coordinator")
                .with_permission(Permission::parse("users.manage").unwrap());
            let user = UserId::new();
            let assignments = vec![Assignment {
                id: AssignmentId::new(),
                user_id: user,
                role_id: role.id,
                organization_id: org_id,
                scope: None,
                valid_from: None,
                valid_until: None,
            }];
            Self {
                user,
                org: OrganizationContext {
                    organization_id: org_id,
                    kind: OrgKind::Customer,
                },
                role,
                assignments,
            }
        }

        fn assemble(&self, window: Option<AccessWindow>) -> Claims {
            assemble(
                self.user,
                self.org,
                window,
                &self.assignments,
                |id| (id == self.role.id).then_some(&self.role),
                today(),
            )
        }
    }

    #[test]
    fn in_window_session_gets_effective_permissions() {
        let f = Fixture::new();
        let claims = f.assemble(open_window());
        assert!(!claims.blocked);
        assert_eq!(claims.organization_kind, OrgKind::Customer);
        assert_eq!(claims.permissions.len(), 1);
    }

    #[test]
    fn window_not_started_degrades_to_blocked() {
        let f = Fixture::new();
        let claims = f.assemble(Some(AccessWindow {
            valid_from: Some("2026-09-01".parse().unwrap()),
            valid_until: None,
        }));
        assert!(claims.blocked);
        assert!(claims.permissions.is_empty());
    }

    #[test]
    fn window_ended_degrades_to_blocked() {
        let f = Fixture::new();
        let claims = f.assemble(Some(AccessWindow {
            valid_from: None,
            valid_until: Some("2026-06-30".parse().unwrap()),
        }));
        assert!(claims.blocked);
    }

    #[test]
    fn missing_grant_degrades_to_blocked() {
        let f = Fixture::new();
        let claims = f.assemble(None);
        assert!(claims.blocked);
        assert!(claims.permissions.is_empty());
    }

    #[test]
    fn assignments_for_other_orgs_are_ignored() {
        let mut f = Fixture::new();
        f.assignments[0].organization_id = OrgId::new();
        let claims = f.assemble(open_window());
        assert!(!claims.blocked);
        assert!(claims.permissions.is_empty());
    }
}
