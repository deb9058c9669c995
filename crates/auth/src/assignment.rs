//! Role assignments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use orgspine_core::{AssignmentId, OrgId, RoleId, ScopePath, UserId};

/// Binds a user to a role within an organization.
///
/// `scope` optionally narrows where the role applies (it must sit within the
/// role's own bound - the command layer enforces that with the delegation
/// checks). The validity window is inclusive on both ends; an open end means
/// unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub organization_id: OrgId,
    pub scope: Option<ScopePath>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl Assignment {
    /// Whether the assignment is in force on `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if let Some(from) = self.valid_from {
            if date < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if date > until {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(from: Option<&str>, until: Option<&str>) -> Assignment {
        Assignment {
            id: AssignmentId::new(),
            user_id: UserId::new(),
            role_id: RoleId::new(),
            organization_id: OrgId::new(),
            scope: None,
            valid_from: from.map(|d| d.parse().unwrap()),
            valid_until: until.map(|d| d.parse().unwrap()),
        }
    }

    fn day(d: &str) -> NaiveDate {
        d.parse().unwrap()
    }

    #[test]
    fn open_window_is_always_active() {
        assert!(assignment(None, None).is_active_on(day("2026-08-07")));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let a = assignment(Some("2026-01-01"), Some("2026-06-30"));
        assert!(!a.is_active_on(day("2025-12-31")));
        assert!(a.is_active_on(day("2026-01-01")));
        assert!(a.is_active_on(day("2026-06-30")));
        assert!(!a.is_active_on(day("2026-07-01")));
    }
}
