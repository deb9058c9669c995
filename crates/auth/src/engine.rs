//! Scope authorization engine.
//!
//! Computes a principal's effective `{permission, scope}` set from currently
//! valid role assignments, and enforces the two delegation invariants on top
//! of it: you cannot grant what you don't hold (subset-only), and you cannot
//! assign outside your reach (scope containment). Violation checks enumerate
//! every offending pair so callers can report all problems in one round trip.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use orgspine_core::{RoleId, ScopePath};

use crate::assignment::Assignment;
use crate::permission::Permission;
use crate::role::RoleDef;

/// One entry of a principal's effective permission set.
///
/// `scope == None` means the permission is held globally (unrestricted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectivePermission {
    pub permission: Permission,
    pub scope: Option<ScopePath>,
}

/// Whether an actor scope reaches a target scope.
///
/// A global actor scope reaches everything; a bounded actor scope reaches its
/// own subtree and never an unbounded target.
pub fn scope_reaches(actor: Option<&ScopePath>, target: Option<&ScopePath>) -> bool {
    match (actor, target) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(a), Some(t)) => a.contains(t),
    }
}

/// Compute the effective permission set for a principal on `today`.
///
/// Each permission of each role granted by an active, non-deleted assignment
/// is tagged with the assignment's scope (falling back to the role's own
/// bound; both absent = global), then collapsed to the widest scope(s) per
/// permission: a global entry absorbs all others, and a scope contained by
/// another candidate is dropped. Incomparable sibling scopes are all kept.
pub fn effective_permissions<'a, F>(
    assignments: &[Assignment],
    role_lookup: F,
    today: NaiveDate,
) -> Vec<EffectivePermission>
where
    F: Fn(RoleId) -> Option<&'a RoleDef>,
{
    let mut candidates: HashMap<Permission, Vec<Option<ScopePath>>> = HashMap::new();

    for assignment in assignments {
        if !assignment.is_active_on(today) {
            continue;
        }
        let Some(role) = role_lookup(assignment.role_id) else {
            continue;
        };
        if role.is_deleted() {
            continue;
        }

        let scope = assignment.scope.clone().or_else(|| role.scope_bound.clone());
        for permission in &role.permissions {
            candidates
                .entry(permission.clone())
                .or_default()
                .push(scope.clone());
        }
    }

    let mut effective = Vec::new();
    for (permission, scopes) in candidates {
        if scopes.iter().any(Option::is_none) {
            effective.push(EffectivePermission {
                permission,
                scope: None,
            });
            continue;
        }

        let scopes: Vec<ScopePath> = scopes.into_iter().flatten().collect();
        for (i, scope) in scopes.iter().enumerate() {
            let shadowed = scopes
                .iter()
                .enumerate()
                .any(|(j, other)| {
                    other.is_ancestor_of(scope) || (j < i && other == scope)
                });
            if !shadowed {
                effective.push(EffectivePermission {
                    permission: permission.clone(),
                    scope: Some(scope.clone()),
                });
            }
        }
    }

    effective.sort_by(|a, b| {
        (a.permission.to_string(), a.scope.as_ref().map(ScopePath::to_string))
            .cmp(&(b.permission.to_string(), b.scope.as_ref().map(ScopePath::to_string)))
    });
    effective
}

/// Membership query over an effective set: does the principal hold
/// `permission` at (or above) `target`?
pub fn holds(
    effective: &[EffectivePermission],
    permission: &Permission,
    target: Option<&ScopePath>,
) -> bool {
    effective
        .iter()
        .filter(|e| &e.permission == permission)
        .any(|e| scope_reaches(e.scope.as_ref(), target))
}

/// One reason a delegation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DelegationViolation {
    /// Subset-only: the actor's effective set does not contain the
    /// permission at all.
    SubsetOnly { permission: Permission },

    /// The actor holds the permission, but no held scope contains the
    /// requested one.
    ScopeNotReachable {
        permission: Permission,
        scope: ScopePath,
    },

    /// An unrestricted target (no scope at all) can only be delegated by an
    /// actor who holds the permission globally.
    GlobalRequired { permission: Permission },
}

/// Subset-only check for granting permissions to a role.
///
/// Collects one violation per missing permission instead of failing fast.
pub fn check_grant(
    actor: &[EffectivePermission],
    requested: &[Permission],
) -> Result<(), Vec<DelegationViolation>> {
    let mut violations = Vec::new();
    for permission in requested {
        if !actor.iter().any(|e| &e.permission == permission) {
            violations.push(DelegationViolation::SubsetOnly {
                permission: permission.clone(),
            });
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Full check for assigning `role` at `requested_scope`.
///
/// The target scope is the requested one, falling back to the role's own
/// bound; both absent means the assignment would be unrestricted. Every
/// permission of the role is checked independently and all violations are
/// returned together.
pub fn check_assignment(
    actor: &[EffectivePermission],
    role: &RoleDef,
    requested_scope: Option<&ScopePath>,
) -> Result<(), Vec<DelegationViolation>> {
    let target = requested_scope.or(role.scope_bound.as_ref());

    let mut permissions: Vec<&Permission> = role.permissions.iter().collect();
    permissions.sort_by_key(|p| p.to_string());

    let mut violations = Vec::new();
    for permission in permissions {
        let held: Vec<_> = actor
            .iter()
            .filter(|e| &e.permission == permission)
            .collect();

        if held.is_empty() {
            violations.push(DelegationViolation::SubsetOnly {
                permission: permission.clone(),
            });
            continue;
        }

        if !held.iter().any(|e| scope_reaches(e.scope.as_ref(), target)) {
            violations.push(match target {
                Some(scope) => DelegationViolation::ScopeNotReachable {
                    permission: permission.clone(),
                    scope: scope.clone(),
                },
                None => DelegationViolation::GlobalRequired {
                    permission: permission.clone(),
                },
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use orgspine_core::{AssignmentId, OrgId, UserId};

    use super::*;

    fn path(s: &str) -> ScopePath {
        ScopePath::parse(s).unwrap()
    }

    fn perm(s: &str) -> Permission {
        Permission::parse(s).unwrap()
    }

    fn today() -> NaiveDate {
        "2026-08-07".parse().unwrap()
    }

    struct Fixture {
        roles: Vec<RoleDef>,
        assignments: Vec<Assignment>,
        user: UserId,
        org: OrgId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                roles: Vec::new(),
                assignments: Vec::new(),
                user: UserId::new(),
                org: OrgId::new(),
            }
        }

        fn role(&mut self, perms: &[&str], bound: Option<&str>) -> RoleId {
            let id = RoleId::new();
            let mut role = RoleDef::new(id, self.org, format!("role-{}", self.roles.len()));
            for p in perms {
                role = role.with_permission(perm(p));
            }
            if let Some(b) = bound {
                role = role.with_scope_bound(path(b));
            }
            self.roles.push(role);
            id
        }

        fn assign(&mut self, role_id: RoleId, scope: Option<&str>) {
            self.assignments.push(Assignment {
                id: AssignmentId::new(),
                user_id: self.user,
                role_id,
                organization_id: self.org,
                scope: scope.map(path),
                valid_from: None,
                valid_until: None,
            });
        }

        fn assign_window(&mut self, role_id: RoleId, from: &str, until: &str) {
            self.assignments.push(Assignment {
                id: AssignmentId::new(),
                user_id: self.user,
                role_id,
                organization_id: self.org,
                scope: None,
                valid_from: Some(from.parse().unwrap()),
                valid_until: Some(until.parse().unwrap()),
            });
        }

        fn effective(&self) -> Vec<EffectivePermission> {
            effective_permissions(
                &self.assignments,
                |id| self.roles.iter().find(|r| r.id == id),
                today(),
            )
        }
    }

    #[test]
    fn expired_assignments_do_not_contribute() {
        let mut f = Fixture::new();
        let r = f.role(&["users.manage"], None);
        f.assign_window(r, "2025-01-01", "2025-12-31");
        assert!(f.effective().is_empty());
    }

    #[test]
    fn deleted_roles_do_not_contribute() {
        let mut f = Fixture::new();
        let r = f.role(&["users.manage"], None);
        f.assign(r, None);
        f.roles[0].deleted_at = Some(chrono::Utc::now());
        assert!(f.effective().is_empty());
    }

    #[test]
    fn assignment_scope_narrows_role_bound() {
        let mut f = Fixture::new();
        let r = f.role(&["users.manage"], Some("root.a"));
        f.assign(r, Some("root.a.b"));

        let effective = f.effective();
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].scope, Some(path("root.a.b")));
    }

    #[test]
    fn widest_scope_wins_per_permission() {
        let mut f = Fixture::new();
        let narrow = f.role(&["users.manage"], Some("root.a.b"));
        let wide = f.role(&["users.manage"], Some("root.a"));
        f.assign(narrow, None);
        f.assign(wide, None);

        let effective = f.effective();
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].scope, Some(path("root.a")));
    }

    #[test]
    fn global_absorbs_every_scoped_entry() {
        let mut f = Fixture::new();
        let scoped = f.role(&["users.manage"], Some("root.a"));
        let global = f.role(&["users.manage"], None);
        f.assign(scoped, None);
        f.assign(global, None);

        let effective = f.effective();
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].scope, None);
    }

    #[test]
    fn incomparable_sibling_scopes_are_both_kept() {
        let mut f = Fixture::new();
        let a = f.role(&["users.manage"], Some("root.a"));
        let b = f.role(&["users.manage"], Some("root.b"));
        f.assign(a, None);
        f.assign(b, None);

        let effective = f.effective();
        assert_eq!(effective.len(), 2);
        assert!(holds(&effective, &perm("users.manage"), Some(&path("root.a.x"))));
        assert!(holds(&effective, &perm("users.manage"), Some(&path("root.b"))));
        assert!(!holds(&effective, &perm("users.manage"), Some(&path("root.c"))));
    }

    #[test]
    fn holds_respects_scope_containment() {
        let mut f = Fixture::new();
        let r = f.role(&["users.manage"], Some("root.a"));
        f.assign(r, None);
        let effective = f.effective();

        assert!(holds(&effective, &perm("users.manage"), Some(&path("root.a"))));
        assert!(holds(&effective, &perm("users.manage"), Some(&path("root.a.b.c"))));
        assert!(!holds(&effective, &perm("users.manage"), Some(&path("root"))));
        assert!(!holds(&effective, &perm("users.manage"), None));
        assert!(!holds(&effective, &perm("roles.assign"), Some(&path("root.a"))));
    }

    #[test]
    fn grant_fails_subset_only_with_all_missing_listed() {
        let mut f = Fixture::new();
        let r = f.role(&["users.manage"], None);
        f.assign(r, None);
        let effective = f.effective();

        let violations = check_grant(
            &effective,
            &[perm("users.manage"), perm("roles.assign"), perm("orgs.manage")],
        )
        .unwrap_err();

        assert_eq!(
            violations,
            vec![
                DelegationViolation::SubsetOnly {
                    permission: perm("roles.assign")
                },
                DelegationViolation::SubsetOnly {
                    permission: perm("orgs.manage")
                },
            ]
        );
    }

    #[test]
    fn assignment_outside_reach_is_rejected_per_permission() {
        let mut f = Fixture::new();
        let actor_role = f.role(&["users.manage", "roles.assign"], Some("root.a"));
        f.assign(actor_role, None);
        let effective = f.effective();

        let target = RoleDef::new(RoleId::new(), f.org, "site-admin")
            .with_permission(perm("users.manage"))
            .with_permission(perm("roles.assign"));

        // In reach: fine.
        assert!(check_assignment(&effective, &target, Some(&path("root.a.b"))).is_ok());

        // Out of reach: one violation per permission, complete list.
        let violations =
            check_assignment(&effective, &target, Some(&path("root.b"))).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| matches!(
            v,
            DelegationViolation::ScopeNotReachable { scope, .. } if *scope == path("root.b")
        )));
    }

    #[test]
    fn unrestricted_role_requires_global_actor() {
        let mut f = Fixture::new();
        let bounded = f.role(&["users.manage"], Some("root.a"));
        f.assign(bounded, None);
        let effective = f.effective();

        let unrestricted =
            RoleDef::new(RoleId::new(), f.org, "admin").with_permission(perm("users.manage"));

        let violations = check_assignment(&effective, &unrestricted, None).unwrap_err();
        assert_eq!(
            violations,
            vec![DelegationViolation::GlobalRequired {
                permission: perm("users.manage")
            }]
        );

        // A global actor can assign it.
        let mut g = Fixture::new();
        let global = g.role(&["users.manage"], None);
        g.assign(global, None);
        assert!(check_assignment(&g.effective(), &unrestricted, None).is_ok());
    }

    #[test]
    fn global_actor_reaches_any_target() {
        let mut f = Fixture::new();
        let global = f.role(&["users.manage"], None);
        f.assign(global, None);
        let effective = f.effective();

        let target = RoleDef::new(RoleId::new(), f.org, "anything")
            .with_permission(perm("users.manage"))
            .with_scope_bound(path("root.zz.deep.down"));
        assert!(check_assignment(&effective, &target, None).is_ok());
        assert!(check_assignment(&effective, &target, Some(&path("root.zz"))).is_ok());
    }
}
