//! Dispatch router: classifies each stored event and hands it to exactly one
//! sub-router.
//!
//! Classification: an event type ending in `.linked`/`.unlinked` is a
//! relationship-link event and goes to the relationship sub-router - except
//! the types on [`LINK_CARVE_OUTS`], which look like link events but mutate
//! their owning aggregate's projection and route by stream family like
//! everything else. The carve-out list is deliberate and exact; it is never
//! inferred from naming.
//!
//! Unknown stream families and unknown event types inside a known family are
//! both fatal: the event keeps its durable row, the error is recorded, and
//! nothing is ever silently skipped.

use orgspine_core::{AssignmentId, GrantId, RoleId, ScheduleId, SessionId, UserId};
use orgspine_domain::link::{LINKED_SUFFIX, UNLINKED_SUFFIX};
use orgspine_domain::rbac::{ROLE_PERMISSION_LINKED, ROLE_PERMISSION_UNLINKED};
use orgspine_domain::{DecodeError, TypedEvent};
use orgspine_events::{DispatchError, DomainEvent, EventDispatcher, StreamType};

use crate::projections::access_grants::{AccessGrantsProjection, GrantRow};
use crate::projections::contacts::{ContactCard, ContactsProjection};
use crate::projections::directory::DirectoryProjection;
use crate::projections::impersonation::{ImpersonationProjection, ImpersonationRow};
use crate::projections::links::{LinkKey, LinkRow, LinksProjection};
use crate::projections::rbac::{AssignmentRow, RbacProjection, RoleRow};
use crate::projections::schedules::{ScheduleRow, SchedulesProjection};
use crate::projections::users::{UserRow, UsersProjection};
use crate::read_model::InMemoryReadModelStore;

/// Link-shaped event types that belong to an aggregate sub-router.
pub const LINK_CARVE_OUTS: &[&str] = &[ROLE_PERMISSION_LINKED, ROLE_PERMISSION_UNLINKED];

type Store<K, V> = InMemoryReadModelStore<K, V>;

/// The projection layer behind one dispatch seam.
pub struct Router {
    directory: DirectoryProjection,
    users: UsersProjection<Store<UserId, UserRow>>,
    rbac: RbacProjection<Store<RoleId, RoleRow>, Store<AssignmentId, AssignmentRow>>,
    schedules: SchedulesProjection<Store<ScheduleId, ScheduleRow>>,
    contacts: ContactsProjection<Store<UserId, ContactCard>>,
    grants: AccessGrantsProjection<Store<GrantId, GrantRow>>,
    impersonation: ImpersonationProjection<Store<SessionId, ImpersonationRow>>,
    links: LinksProjection<Store<LinkKey, LinkRow>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            directory: DirectoryProjection::new(),
            users: UsersProjection::new(Store::new()),
            rbac: RbacProjection::new(Store::new(), Store::new()),
            schedules: SchedulesProjection::new(Store::new()),
            contacts: ContactsProjection::new(Store::new()),
            grants: AccessGrantsProjection::new(Store::new()),
            impersonation: ImpersonationProjection::new(Store::new()),
            links: LinksProjection::new(Store::new()),
        }
    }

    pub fn directory(&self) -> &DirectoryProjection {
        &self.directory
    }

    pub fn users(&self) -> &UsersProjection<Store<UserId, UserRow>> {
        &self.users
    }

    pub fn rbac(&self) -> &RbacProjection<Store<RoleId, RoleRow>, Store<AssignmentId, AssignmentRow>> {
        &self.rbac
    }

    pub fn schedules(&self) -> &SchedulesProjection<Store<ScheduleId, ScheduleRow>> {
        &self.schedules
    }

    pub fn contacts(&self) -> &ContactsProjection<Store<UserId, ContactCard>> {
        &self.contacts
    }

    pub fn grants(&self) -> &AccessGrantsProjection<Store<GrantId, GrantRow>> {
        &self.grants
    }

    pub fn impersonation(&self) -> &ImpersonationProjection<Store<SessionId, ImpersonationRow>> {
        &self.impersonation
    }

    pub fn links(&self) -> &LinksProjection<Store<LinkKey, LinkRow>> {
        &self.links
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<E: TypedEvent>(event: &DomainEvent) -> Result<E, DispatchError> {
    E::decode(&event.event_type, &event.event_data).map_err(|err| match &err {
        DecodeError::UnknownType(event_type) => DispatchError::UnrecognizedEventType {
            stream_type: event.stream_type.clone(),
            event_type: event_type.clone(),
        },
        DecodeError::Payload { .. } => DispatchError::Payload(err.to_string()),
    })
}

impl EventDispatcher for Router {
    fn dispatch(&self, event: &DomainEvent) -> Result<(), DispatchError> {
        let stream_type = StreamType::parse(&event.stream_type)?;

        if stream_type == StreamType::AdminSignal {
            // Signaling streams carry no projection at all.
            tracing::debug!(event_type = %event.event_type, "admin signal, no-op");
            return Ok(());
        }

        let event_type = event.event_type.as_str();
        let link_shaped =
            event_type.ends_with(LINKED_SUFFIX) || event_type.ends_with(UNLINKED_SUFFIX);
        if link_shaped && !LINK_CARVE_OUTS.contains(&event_type) {
            return self.links.apply(event, &decode(event)?);
        }

        match stream_type {
            StreamType::User => self.users.apply(event, &decode(event)?),
            StreamType::Organization => self.directory.apply_org(event, &decode(event)?),
            StreamType::OrganizationUnit => self.directory.apply_unit(event, &decode(event)?),
            StreamType::Rbac => self.rbac.apply(event, &decode(event)?),
            StreamType::Schedule => self.schedules.apply(event, &decode(event)?),
            StreamType::Contact => self.contacts.apply(event, &decode(event)?),
            StreamType::AccessGrant => self.grants.apply(event, &decode(event)?),
            StreamType::Impersonation => self.impersonation.apply(event, &decode(event)?),
            StreamType::Relationship => self.links.apply(event, &decode(event)?),
            StreamType::AdminSignal => Ok(()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
