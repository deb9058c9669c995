//! `orgspine-core` - domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod audit;
pub mod error;
pub mod id;
pub mod org;
pub mod path;
pub mod value_object;
pub mod version;

pub use audit::{Actor, Justification};
pub use error::{DomainError, DomainResult};
pub use id::{
    AssignmentId, EventId, GrantId, OrgId, OrgUnitId, RoleId, ScheduleId, SessionId, UserId,
};
pub use org::OrgKind;
pub use path::ScopePath;
pub use value_object::ValueObject;
pub use version::ExpectedVersion;
