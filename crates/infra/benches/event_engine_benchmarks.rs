use chrono::Utc;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use uuid::Uuid;

use orgspine_auth::{Assignment, Permission, RoleDef, effective_permissions};
use orgspine_core::{
    Actor, AssignmentId, EventId, OrgId, OrgKind, OrgUnitId, RoleId, ScopePath, UserId,
};
use orgspine_domain::TypedEvent;
use orgspine_domain::organization::{OrganizationCreated, OrganizationDeactivated, OrganizationEvent};
use orgspine_domain::unit::{UnitCreated, UnitEvent};
use orgspine_events::{DomainEvent, EventMetadata};
use orgspine_infra::projections::directory::DirectoryProjection;

fn event_for<E: TypedEvent>(stream_type: &str, payload: &E) -> DomainEvent {
    DomainEvent {
        id: EventId::new(),
        stream_id: Uuid::now_v7(),
        stream_type: stream_type.to_string(),
        stream_version: 1,
        event_type: payload.event_type().to_string(),
        event_data: payload.to_data().unwrap(),
        metadata: EventMetadata::new(Actor::user(UserId::new())),
        created_at: Utc::now(),
        processed_at: None,
        processing_error: None,
        retry_count: 0,
    }
}

/// Directory with one org and `width * depth` units.
fn build_tree(width: usize, depth: usize) -> (DirectoryProjection, OrgId) {
    let directory = DirectoryProjection::new();
    let org_id = OrgId::new();

    let created = OrganizationEvent::Created(OrganizationCreated {
        org_id,
        name: "acme".into(),
        kind: OrgKind::Customer,
        path: ScopePath::parse("acme").unwrap(),
    });
    directory.apply_org(&event_for("organization", &created), &created).unwrap();

    for w in 0..width {
        let mut path = format!("acme.branch{w}");
        for d in 0..depth {
            let created = UnitEvent::Created(UnitCreated {
                unit_id: OrgUnitId::new(),
                org_id,
                name: format!("branch{w}-{d}"),
                path: ScopePath::parse(&path).unwrap(),
            });
            directory.apply_unit(&event_for("organization_unit", &created), &created).unwrap();
            path = format!("{path}.n{d}");
        }
    }

    (directory, org_id)
}

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade_deactivate");
    for width in [10usize, 100] {
        let (directory, org_id) = build_tree(width, 5);
        let deactivated = OrganizationEvent::Deactivated(OrganizationDeactivated {
            org_id,
            affected_units: vec![],
        });
        let event = event_for("organization", &deactivated);

        group.bench_with_input(BenchmarkId::from_parameter(width * 5), &width, |b, _| {
            b.iter(|| {
                directory.apply_org(black_box(&event), black_box(&deactivated)).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_effective_permissions(c: &mut Criterion) {
    let org_id = OrgId::new();
    let user_id = UserId::new();
    let today = "2026-08-07".parse().unwrap();

    let mut roles = Vec::new();
    let mut assignments = Vec::new();
    for i in 0..50 {
        let role_id = RoleId::new();
        let mut role = RoleDef::new(role_id, org_id, format!("role{i}"));
        for p in 0..10 {
            role = role.with_permission(Permission::new("area", format!("action{p}")));
        }
        role.scope_bound = Some(ScopePath::parse(format!("acme.branch{}", i % 7)).unwrap());
        roles.push(role);
        assignments.push(Assignment {
            id: AssignmentId::new(),
            user_id,
            role_id,
            organization_id: org_id,
            scope: None,
            valid_from: None,
            valid_until: None,
        });
    }

    c.bench_function("effective_permissions_50_roles", |b| {
        b.iter(|| {
            let effective = effective_permissions(
                black_box(&assignments),
                |id| roles.iter().find(|r| r.id == id),
                today,
            );
            black_box(effective)
        });
    });
}

criterion_group!(benches, bench_cascade, bench_effective_permissions);
criterion_main!(benches);
