//! Relationship (junction) events.
//!
//! A link event records or removes an association between two existing
//! aggregates without mutating either one's own state. The event type is
//! `<left>.<right>.linked` / `.unlinked`; the dispatch router sends every
//! `.linked`/`.unlinked` type here except the carve-out list owned by the
//! router itself.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{DecodeError, TypedEvent};

pub const LINKED_SUFFIX: &str = ".linked";
pub const UNLINKED_SUFFIX: &str = ".unlinked";

/// The closed set of junctions this deployment maintains.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// User is a member of an organization unit.
    UserUnit,
    /// User works under an operating schedule.
    UserSchedule,
    /// Unit operates under a schedule.
    UnitSchedule,
}

impl LinkKind {
    pub const ALL: &'static [LinkKind] =
        &[LinkKind::UserUnit, LinkKind::UserSchedule, LinkKind::UnitSchedule];

    /// The `<left>.<right>` event-type prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            LinkKind::UserUnit => "user.unit",
            LinkKind::UserSchedule => "user.schedule",
            LinkKind::UnitSchedule => "unit.schedule",
        }
    }

    pub fn linked_type(&self) -> &'static str {
        match self {
            LinkKind::UserUnit => "user.unit.linked",
            LinkKind::UserSchedule => "user.schedule.linked",
            LinkKind::UnitSchedule => "unit.schedule.linked",
        }
    }

    pub fn unlinked_type(&self) -> &'static str {
        match self {
            LinkKind::UserUnit => "user.unit.unlinked",
            LinkKind::UserSchedule => "user.schedule.unlinked",
            LinkKind::UnitSchedule => "unit.schedule.unlinked",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<LinkKind> {
        Self::ALL.iter().copied().find(|k| k.prefix() == prefix)
    }
}

/// The two aggregate instances being associated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEnds {
    pub left_id: Uuid,
    pub right_id: Uuid,
}

/// All relationship events.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Linked { kind: LinkKind, ends: LinkEnds },
    Unlinked { kind: LinkKind, ends: LinkEnds },
}

impl LinkEvent {
    pub fn kind(&self) -> LinkKind {
        match self {
            LinkEvent::Linked { kind, .. } | LinkEvent::Unlinked { kind, .. } => *kind,
        }
    }

    pub fn ends(&self) -> LinkEnds {
        match self {
            LinkEvent::Linked { ends, .. } | LinkEvent::Unlinked { ends, .. } => *ends,
        }
    }
}

impl TypedEvent for LinkEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LinkEvent::Linked { kind, .. } => kind.linked_type(),
            LinkEvent::Unlinked { kind, .. } => kind.unlinked_type(),
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let unknown = || DecodeError::UnknownType(event_type.to_string());

        let (prefix, linked) = if let Some(p) = event_type.strip_suffix(LINKED_SUFFIX) {
            (p, true)
        } else if let Some(p) = event_type.strip_suffix(UNLINKED_SUFFIX) {
            (p, false)
        } else {
            return Err(unknown());
        };

        let kind = LinkKind::from_prefix(prefix).ok_or_else(unknown)?;
        let ends: LinkEnds = serde_json::from_value(data.clone())
            .map_err(|e| DecodeError::payload(event_type, e))?;

        Ok(if linked {
            LinkEvent::Linked { kind, ends }
        } else {
            LinkEvent::Unlinked { kind, ends }
        })
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self.ends())
    }
}
