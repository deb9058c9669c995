//! Event-type registry.
//!
//! One flat view over every event type the deployment knows, used to verify
//! (before anything ships) that the typed enums and the dotted names agree
//! and that no two families claim the same name.

use crate::{contact, grant, impersonation, link, organization, rbac, schedule, unit, user};

/// Every registered event type, grouped by family order.
pub fn all_event_types() -> Vec<&'static str> {
    let mut types = vec![
        user::USER_CREATED,
        user::USER_PROFILE_UPDATED,
        user::USER_DEACTIVATED,
        user::USER_REACTIVATED,
        organization::ORG_CREATED,
        organization::ORG_RENAMED,
        organization::ORG_SETTINGS_UPDATED,
        organization::ORG_DEACTIVATED,
        organization::ORG_REACTIVATED,
        unit::UNIT_CREATED,
        unit::UNIT_RENAMED,
        unit::UNIT_MOVED,
        unit::UNIT_DEACTIVATED,
        unit::UNIT_REACTIVATED,
        rbac::ROLE_CREATED,
        rbac::ROLE_RENAMED,
        rbac::ROLE_DELETED,
        rbac::ROLE_PERMISSION_LINKED,
        rbac::ROLE_PERMISSION_UNLINKED,
        rbac::ROLE_ASSIGNED,
        rbac::ROLE_UNASSIGNED,
        schedule::SCHEDULE_DEFINED,
        schedule::SCHEDULE_UPDATED,
        schedule::SCHEDULE_REMOVED,
        contact::CONTACT_ADDRESS_SET,
        contact::CONTACT_ADDRESS_CLEARED,
        contact::CONTACT_PHONE_ADDED,
        contact::CONTACT_PHONE_REMOVED,
        contact::CONTACT_EMAIL_ADDED,
        contact::CONTACT_EMAIL_REMOVED,
        contact::CONTACT_NOTIFY_PREF_SET,
        grant::GRANT_GRANTED,
        grant::GRANT_WINDOW_CHANGED,
        grant::GRANT_REVOKED,
        impersonation::IMPERSONATION_STARTED,
        impersonation::IMPERSONATION_ENDED,
    ];
    for kind in link::LinkKind::ALL {
        types.push(kind.linked_type());
        types.push(kind.unlinked_type());
    }
    types
}

/// Startup sanity check: no duplicate names across families.
pub fn verify() -> Result<(), String> {
    let types = all_event_types();
    let mut seen = std::collections::HashSet::new();
    for t in &types {
        if !seen.insert(*t) {
            return Err(format!("duplicate event type '{t}' in registry"));
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Completeness tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use orgspine_auth::Permission;
    use orgspine_core::{
        AssignmentId, GrantId, OrgId, OrgKind, OrgUnitId, RoleId, ScheduleId, ScopePath,
        SessionId, UserId,
    };

    use super::*;
    use crate::TypedEvent;
    use crate::contact::*;
    use crate::grant::*;
    use crate::impersonation::*;
    use crate::link::*;
    use crate::organization::*;
    use crate::rbac::*;
    use crate::schedule::*;
    use crate::unit::*;
    use crate::user::*;

    #[test]
    fn registry_has_no_duplicates() {
        verify().unwrap();
    }

    fn assert_covered<E>(samples: Vec<E>)
    where
        E: TypedEvent + PartialEq + core::fmt::Debug,
    {
        for sample in samples {
            let event_type = sample.event_type();
            assert!(
                all_event_types().contains(&event_type),
                "'{event_type}' missing from registry"
            );
            let data = sample.to_data().unwrap();
            let decoded = E::decode(event_type, &data).unwrap();
            assert_eq!(decoded, sample);
        }
    }

    fn path(s: &str) -> ScopePath {
        ScopePath::parse(s).unwrap()
    }

    #[test]
    fn every_family_variant_is_registered_and_decodable() {
        let user_id = UserId::new();
        let org_id = OrgId::new();
        let unit_id = OrgUnitId::new();
        let role_id = RoleId::new();

        assert_covered(vec![
            UserEvent::Created(UserCreated {
                user_id,
                organization_id: org_id,
                email: "nina@example.org".into(),
                display_name: "Nina".into(),
            }),
            UserEvent::ProfileUpdated(UserProfileUpdated {
                user_id,
                email: None,
                display_name: Some("Nina R.".into()),
            }),
            UserEvent::Deactivated(UserDeactivated { user_id }),
            UserEvent::Reactivated(UserReactivated { user_id }),
        ]);

        assert_covered(vec![
            OrganizationEvent::Created(OrganizationCreated {
                org_id,
                name: "Acme".into(),
                kind: OrgKind::Customer,
                path: path("acme"),
            }),
            OrganizationEvent::Renamed(OrganizationRenamed {
                org_id,
                name: "Acme Group".into(),
            }),
            OrganizationEvent::SettingsUpdated(OrganizationSettingsUpdated {
                org_id,
                settings: json!({"locale": "en-GB"}),
            }),
            OrganizationEvent::Deactivated(OrganizationDeactivated {
                org_id,
                affected_units: vec![unit_id],
            }),
            OrganizationEvent::Reactivated(OrganizationReactivated {
                org_id,
                affected_units: vec![unit_id],
            }),
        ]);

        assert_covered(vec![
            UnitEvent::Created(UnitCreated {
                unit_id,
                org_id,
                name: "East Wing".into(),
                path: path("acme.east"),
            }),
            UnitEvent::Renamed(UnitRenamed {
                unit_id,
                name: "East Campus".into(),
            }),
            UnitEvent::Moved(UnitMoved {
                unit_id,
                from_path: path("acme.east"),
                to_path: path("acme.north.east"),
            }),
            UnitEvent::Deactivated(UnitDeactivated {
                unit_id,
                affected_units: vec![],
            }),
            UnitEvent::Reactivated(UnitReactivated {
                unit_id,
                affected_units: vec![],
            }),
        ]);

        assert_covered(vec![
            RbacEvent::RoleCreated(RoleCreated {
                role_id,
                org_id,
                name: "coordinator".into(),
                scope_bound: Some(path("acme.east")),
            }),
            RbacEvent::RoleRenamed(RoleRenamed {
                role_id,
                name: "site coordinator".into(),
            }),
            RbacEvent::RoleDeleted(RoleDeleted { role_id }),
            RbacEvent::PermissionLinked(RolePermissionLinked {
                role_id,
                permission: Permission::parse("users.manage").unwrap(),
            }),
            RbacEvent::PermissionUnlinked(RolePermissionUnlinked {
                role_id,
                permission: Permission::parse("users.manage").unwrap(),
            }),
            RbacEvent::Assigned(RoleAssigned {
                assignment_id: AssignmentId::new(),
                user_id,
                role_id,
                org_id,
                scope: None,
                valid_from: Some("2026-01-01".parse().unwrap()),
                valid_until: None,
            }),
            RbacEvent::Unassigned(RoleUnassigned {
                assignment_id: AssignmentId::new(),
            }),
        ]);

        assert_covered(vec![
            ScheduleEvent::Defined(ScheduleDefined {
                schedule_id: ScheduleId::new(),
                unit_id,
                name: "day shift".into(),
                windows: vec![ScheduleWindow {
                    day: DayOfWeek::Monday,
                    opens: "08:00:00".parse().unwrap(),
                    closes: "17:00:00".parse().unwrap(),
                }],
            }),
            ScheduleEvent::Updated(ScheduleUpdated {
                schedule_id: ScheduleId::new(),
                windows: vec![],
            }),
            ScheduleEvent::Removed(ScheduleRemoved {
                schedule_id: ScheduleId::new(),
            }),
        ]);

        let phone_id = Uuid::now_v7();
        assert_covered(vec![
            ContactEvent::AddressSet(AddressSet {
                user_id,
                address: PostalAddress {
                    street: "1 High St".into(),
                    city: "Leeds".into(),
                    region: "West Yorkshire".into(),
                    postal_code: "LS1 1AA".into(),
                    country: "GB".into(),
                },
            }),
            ContactEvent::AddressCleared(AddressCleared { user_id }),
            ContactEvent::PhoneAdded(PhoneAdded {
                user_id,
                phone_id,
                number: "+44 113 496 0000".into(),
                label: "work".into(),
            }),
            ContactEvent::PhoneRemoved(PhoneRemoved { user_id, phone_id }),
            ContactEvent::EmailAdded(EmailAdded {
                user_id,
                email_id: Uuid::now_v7(),
                address: "nina@example.org".into(),
                label: "work".into(),
            }),
            ContactEvent::EmailRemoved(EmailRemoved {
                user_id,
                email_id: Uuid::now_v7(),
            }),
            ContactEvent::NotificationPreferenceSet(NotificationPreferenceSet {
                user_id,
                via: ContactRef::Phone(phone_id),
                enabled: true,
            }),
        ]);

        assert_covered(vec![
            GrantEvent::Granted(AccessGranted {
                grant_id: GrantId::new(),
                user_id,
                org_id,
                valid_from: None,
                valid_until: Some("2026-12-31".parse().unwrap()),
            }),
            GrantEvent::WindowChanged(AccessWindowChanged {
                grant_id: GrantId::new(),
                valid_from: Some("2026-01-01".parse().unwrap()),
                valid_until: None,
            }),
            GrantEvent::Revoked(AccessRevoked {
                grant_id: GrantId::new(),
            }),
        ]);

        assert_covered(vec![
            ImpersonationEvent::Started(ImpersonationStarted {
                session_id: SessionId::new(),
                admin_id: UserId::new(),
                target_user_id: user_id,
            }),
            ImpersonationEvent::Ended(ImpersonationEnded {
                session_id: SessionId::new(),
            }),
        ]);

        let ends = LinkEnds {
            left_id: Uuid::now_v7(),
            right_id: Uuid::now_v7(),
        };
        let mut link_samples = Vec::new();
        for kind in LinkKind::ALL {
            link_samples.push(LinkEvent::Linked { kind: *kind, ends });
            link_samples.push(LinkEvent::Unlinked { kind: *kind, ends });
        }
        assert_covered(link_samples);
    }

    #[test]
    fn unknown_types_fail_decode_in_every_family() {
        let data = json!({});
        assert!(UserEvent::decode("user.renamed", &data).is_err());
        assert!(OrganizationEvent::decode("organization.archived", &data).is_err());
        assert!(RbacEvent::decode("role.cloned", &data).is_err());
        assert!(LinkEvent::decode("user.invoice.linked", &data).is_err());
        assert!(LinkEvent::decode("user.unit.joined", &data).is_err());
    }
}
