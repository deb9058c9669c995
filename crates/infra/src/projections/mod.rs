//! Projection handlers (read model builders).
//!
//! Events are the source of truth; every row here is disposable and derived.
//! Handlers are idempotent through upsert/insert-if-absent semantics keyed by
//! the aggregate's natural id, never by event id. Deletion discipline differs
//! per aggregate and is part of each projection's contract: the directory,
//! users, roles and access grants soft-delete; assignments, contact entries,
//! schedules, links and impersonation sessions hard-delete.

pub mod access_grants;
pub mod contacts;
pub mod directory;
pub mod impersonation;
pub mod links;
pub mod rbac;
pub mod schedules;
pub mod users;
