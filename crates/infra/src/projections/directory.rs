//! Organization directory projection: the hierarchy tree and its cascades.
//!
//! Organizations are root nodes, units are everything below. Activation state
//! cascades by path-prefix containment: deactivating a node flips the node
//! and its full descendant set in one pass under one write lock, so no
//! partial cascade is ever observable by a concurrent reader.
//!
//! The deactivation/reactivation events carry the affected descendant ids for
//! audit only; this projection recomputes the affected set from the *current*
//! tree, so processing stays correct even when the tree changed between
//! emission and (re)dispatch.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use orgspine_core::{DomainError, DomainResult, EventId, OrgId, OrgKind, OrgUnitId, ScopePath};
use orgspine_domain::organization::OrganizationEvent;
use orgspine_domain::unit::UnitEvent;
use orgspine_events::{DispatchError, DomainEvent};

/// Organization row (root node). Soft-deleted via the active flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgRow {
    pub org_id: OrgId,
    pub name: String,
    pub kind: OrgKind,
    pub path: ScopePath,
    pub active: bool,
    pub deactivated_at: Option<DateTime<Utc>>,
    pub settings: JsonValue,
    pub last_event_id: EventId,
}

/// Organization-unit row (non-root node).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRow {
    pub unit_id: OrgUnitId,
    pub org_id: OrgId,
    pub name: String,
    pub path: ScopePath,
    pub active: bool,
    pub last_event_id: EventId,
}

#[derive(Debug, Default)]
struct Tree {
    orgs: HashMap<OrgId, OrgRow>,
    units: HashMap<OrgUnitId, UnitRow>,
}

impl Tree {
    fn node_active(&self, path: &ScopePath) -> Option<bool> {
        if let Some(org) = self.orgs.values().find(|o| &o.path == path) {
            return Some(org.active);
        }
        self.units.values().find(|u| &u.path == path).map(|u| u.active)
    }

    fn node_exists(&self, path: &ScopePath) -> bool {
        self.node_active(path).is_some()
    }

    /// Flip `active` on every node at or under `prefix`. One set operation.
    fn cascade(&mut self, prefix: &ScopePath, active: bool, at: DateTime<Utc>) {
        for org in self.orgs.values_mut() {
            if prefix.contains(&org.path) {
                org.active = active;
                org.deactivated_at = if active { None } else { Some(at) };
            }
        }
        for unit in self.units.values_mut() {
            if prefix.contains(&unit.path) {
                unit.active = active;
            }
        }
    }
}

/// The directory projection and hierarchical cascade engine.
#[derive(Debug, Default)]
pub struct DirectoryProjection {
    tree: RwLock<Tree>,
}

impl DirectoryProjection {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tree>, DispatchError> {
        self.tree
            .read()
            .map_err(|_| DispatchError::Handler("directory lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tree>, DispatchError> {
        self.tree
            .write()
            .map_err(|_| DispatchError::Handler("directory lock poisoned".to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Handlers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn apply_org(
        &self,
        event: &DomainEvent,
        payload: &OrganizationEvent,
    ) -> Result<(), DispatchError> {
        let mut tree = self.write()?;
        match payload {
            OrganizationEvent::Created(e) => {
                if e.path.depth() != 1 {
                    return Err(DispatchError::Payload(format!(
                        "organization path '{}' must be a single root segment",
                        e.path
                    )));
                }
                tree.orgs.insert(
                    e.org_id,
                    OrgRow {
                        org_id: e.org_id,
                        name: e.name.clone(),
                        kind: e.kind,
                        path: e.path.clone(),
                        active: true,
                        deactivated_at: None,
                        settings: JsonValue::Null,
                        last_event_id: event.id,
                    },
                );
            }
            OrganizationEvent::Renamed(e) => {
                let org = tree.orgs.get_mut(&e.org_id).ok_or_else(|| {
                    DispatchError::Precondition(format!("organization {} not projected", e.org_id))
                })?;
                org.name = e.name.clone();
                org.last_event_id = event.id;
            }
            OrganizationEvent::SettingsUpdated(e) => {
                let org = tree.orgs.get_mut(&e.org_id).ok_or_else(|| {
                    DispatchError::Precondition(format!("organization {} not projected", e.org_id))
                })?;
                org.settings = e.settings.clone();
                org.last_event_id = event.id;
            }
            OrganizationEvent::Deactivated(e) => {
                let path = tree
                    .orgs
                    .get(&e.org_id)
                    .map(|o| o.path.clone())
                    .ok_or_else(|| {
                        DispatchError::Precondition(format!(
                            "organization {} not projected",
                            e.org_id
                        ))
                    })?;
                tree.cascade(&path, false, event.created_at);
                if let Some(org) = tree.orgs.get_mut(&e.org_id) {
                    org.last_event_id = event.id;
                }
            }
            OrganizationEvent::Reactivated(e) => {
                let path = tree
                    .orgs
                    .get(&e.org_id)
                    .map(|o| o.path.clone())
                    .ok_or_else(|| {
                        DispatchError::Precondition(format!(
                            "organization {} not projected",
                            e.org_id
                        ))
                    })?;
                tree.cascade(&path, true, event.created_at);
                if let Some(org) = tree.orgs.get_mut(&e.org_id) {
                    org.last_event_id = event.id;
                }
            }
        }
        Ok(())
    }

    pub fn apply_unit(
        &self,
        event: &DomainEvent,
        payload: &UnitEvent,
    ) -> Result<(), DispatchError> {
        let mut tree = self.write()?;
        match payload {
            UnitEvent::Created(e) => {
                let parent = e.path.parent().ok_or_else(|| {
                    DispatchError::Payload(format!(
                        "unit path '{}' has no parent segment",
                        e.path
                    ))
                })?;
                let parent_active = tree.node_active(&parent).ok_or_else(|| {
                    DispatchError::Precondition(format!("parent '{parent}' not projected"))
                })?;
                // A node is never active under an inactive ancestor.
                tree.units.insert(
                    e.unit_id,
                    UnitRow {
                        unit_id: e.unit_id,
                        org_id: e.org_id,
                        name: e.name.clone(),
                        path: e.path.clone(),
                        active: parent_active,
                        last_event_id: event.id,
                    },
                );
            }
            UnitEvent::Renamed(e) => {
                let unit = tree.units.get_mut(&e.unit_id).ok_or_else(|| {
                    DispatchError::Precondition(format!("unit {} not projected", e.unit_id))
                })?;
                unit.name = e.name.clone();
                unit.last_event_id = event.id;
            }
            UnitEvent::Moved(e) => {
                // Rebase from the row's *current* path, not the emitted one.
                let current = tree
                    .units
                    .get(&e.unit_id)
                    .map(|u| u.path.clone())
                    .ok_or_else(|| {
                        DispatchError::Precondition(format!("unit {} not projected", e.unit_id))
                    })?;
                let new_parent = e.to_path.parent().ok_or_else(|| {
                    DispatchError::Payload(format!(
                        "target path '{}' has no parent segment",
                        e.to_path
                    ))
                })?;
                let parent_active = tree.node_active(&new_parent).ok_or_else(|| {
                    DispatchError::Precondition(format!("target parent '{new_parent}' not projected"))
                })?;

                for unit in tree.units.values_mut() {
                    if let Some(rebased) = unit.path.rebase(&current, &e.to_path) {
                        unit.path = rebased;
                        if !parent_active {
                            unit.active = false;
                        }
                    }
                }
                if let Some(unit) = tree.units.get_mut(&e.unit_id) {
                    unit.last_event_id = event.id;
                }
            }
            UnitEvent::Deactivated(e) => {
                let path = tree
                    .units
                    .get(&e.unit_id)
                    .map(|u| u.path.clone())
                    .ok_or_else(|| {
                        DispatchError::Precondition(format!("unit {} not projected", e.unit_id))
                    })?;
                tree.cascade(&path, false, event.created_at);
                if let Some(unit) = tree.units.get_mut(&e.unit_id) {
                    unit.last_event_id = event.id;
                }
            }
            UnitEvent::Reactivated(e) => {
                let path = tree
                    .units
                    .get(&e.unit_id)
                    .map(|u| u.path.clone())
                    .ok_or_else(|| {
                        DispatchError::Precondition(format!("unit {} not projected", e.unit_id))
                    })?;
                tree.cascade(&path, true, event.created_at);
                if let Some(unit) = tree.units.get_mut(&e.unit_id) {
                    unit.last_event_id = event.id;
                }
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn org(&self, org_id: OrgId) -> Option<OrgRow> {
        self.tree.read().ok()?.orgs.get(&org_id).cloned()
    }

    pub fn unit(&self, unit_id: OrgUnitId) -> Option<UnitRow> {
        self.tree.read().ok()?.units.get(&unit_id).cloned()
    }

    /// Activation state of the node at `path`, if one exists.
    pub fn node_active(&self, path: &ScopePath) -> Option<bool> {
        self.tree.read().ok()?.node_active(path)
    }

    /// All unit rows at or under `prefix`.
    pub fn units_under(&self, prefix: &ScopePath) -> Vec<UnitRow> {
        match self.tree.read() {
            Ok(tree) => {
                let mut units: Vec<UnitRow> = tree
                    .units
                    .values()
                    .filter(|u| prefix.contains(&u.path))
                    .cloned()
                    .collect();
                units.sort_by(|a, b| a.path.as_str().cmp(b.path.as_str()));
                units
            }
            Err(_) => vec![],
        }
    }

    /// Command-boundary precondition for reactivation: every ancestor of the
    /// node at `path` must currently be active. Deactivation needs no such
    /// check. The handler itself applies cascades unconditionally so that
    /// replay stays deterministic; callers run this before emitting.
    pub fn ensure_reactivation_allowed(&self, path: &ScopePath) -> DomainResult<()> {
        let tree = self
            .tree
            .read()
            .map_err(|_| DomainError::invariant("directory lock poisoned"))?;
        for ancestor in path.ancestors() {
            match tree.node_active(&ancestor) {
                Some(true) => {}
                Some(false) => {
                    return Err(DomainError::invariant(format!(
                        "cannot reactivate '{path}': ancestor '{ancestor}' is inactive"
                    )));
                }
                None => {
                    return Err(DomainError::invariant(format!(
                        "cannot reactivate '{path}': ancestor '{ancestor}' is not projected"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
