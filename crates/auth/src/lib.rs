//! `orgspine-auth` - hierarchical scope authorization (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage: the engine
//! computes over plain role/assignment values handed in by the caller, and the
//! authorization context it produces (`Claims`) is an explicit, immutable
//! value passed through call paths - never ambient session state.

pub mod assignment;
pub mod claims;
pub mod engine;
pub mod permission;
pub mod role;

pub use assignment::Assignment;
pub use claims::{AccessWindow, Claims, OrganizationContext};
pub use engine::{
    DelegationViolation, EffectivePermission, check_assignment, check_grant,
    effective_permissions, holds, scope_reaches,
};
pub use permission::Permission;
pub use role::RoleDef;
