//! Access-grant aggregate family events.
//!
//! An access grant opens a dated window in which a user may establish
//! sessions against an organization. Grants are soft-deleted on revocation:
//! the row stays, `revoked_at` set, and claims assembly treats it as absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use orgspine_core::{GrantId, OrgId, UserId};

use crate::{DecodeError, TypedEvent};

pub const GRANT_GRANTED: &str = "access_grant.granted";
pub const GRANT_WINDOW_CHANGED: &str = "access_grant.window_changed";
pub const GRANT_REVOKED: &str = "access_grant.revoked";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGranted {
    pub grant_id: GrantId,
    pub user_id: UserId,
    pub org_id: OrgId,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessWindowChanged {
    pub grant_id: GrantId,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRevoked {
    pub grant_id: GrantId,
}

/// All access-grant events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantEvent {
    Granted(AccessGranted),
    WindowChanged(AccessWindowChanged),
    Revoked(AccessRevoked),
}

impl TypedEvent for GrantEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GrantEvent::Granted(_) => GRANT_GRANTED,
            GrantEvent::WindowChanged(_) => GRANT_WINDOW_CHANGED,
            GrantEvent::Revoked(_) => GRANT_REVOKED,
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let payload = |e| DecodeError::payload(event_type, e);
        match event_type {
            GRANT_GRANTED => serde_json::from_value(data.clone())
                .map(GrantEvent::Granted)
                .map_err(payload),
            GRANT_WINDOW_CHANGED => serde_json::from_value(data.clone())
                .map(GrantEvent::WindowChanged)
                .map_err(payload),
            GRANT_REVOKED => serde_json::from_value(data.clone())
                .map(GrantEvent::Revoked)
                .map_err(payload),
            _ => Err(DecodeError::UnknownType(event_type.to_string())),
        }
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            GrantEvent::Granted(e) => serde_json::to_value(e),
            GrantEvent::WindowChanged(e) => serde_json::to_value(e),
            GrantEvent::Revoked(e) => serde_json::to_value(e),
        }
    }
}
