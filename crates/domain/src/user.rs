//! User aggregate family events.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use orgspine_core::{OrgId, UserId};

use crate::{DecodeError, TypedEvent};

pub const USER_CREATED: &str = "user.created";
pub const USER_PROFILE_UPDATED: &str = "user.profile_updated";
pub const USER_DEACTIVATED: &str = "user.deactivated";
pub const USER_REACTIVATED: &str = "user.reactivated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreated {
    pub user_id: UserId,
    pub organization_id: OrgId,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileUpdated {
    pub user_id: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDeactivated {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReactivated {
    pub user_id: UserId,
}

/// All user events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    Created(UserCreated),
    ProfileUpdated(UserProfileUpdated),
    Deactivated(UserDeactivated),
    Reactivated(UserReactivated),
}

impl TypedEvent for UserEvent {
    fn event_type(&self) -> &'static str {
        match self {
            UserEvent::Created(_) => USER_CREATED,
            UserEvent::ProfileUpdated(_) => USER_PROFILE_UPDATED,
            UserEvent::Deactivated(_) => USER_DEACTIVATED,
            UserEvent::Reactivated(_) => USER_REACTIVATED,
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let payload = |e| DecodeError::payload(event_type, e);
        match event_type {
            USER_CREATED => serde_json::from_value(data.clone())
                .map(UserEvent::Created)
                .map_err(payload),
            USER_PROFILE_UPDATED => serde_json::from_value(data.clone())
                .map(UserEvent::ProfileUpdated)
                .map_err(payload),
            USER_DEACTIVATED => serde_json::from_value(data.clone())
                .map(UserEvent::Deactivated)
                .map_err(payload),
            USER_REACTIVATED => serde_json::from_value(data.clone())
                .map(UserEvent::Reactivated)
                .map_err(payload),
            _ => Err(DecodeError::UnknownType(event_type.to_string())),
        }
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            UserEvent::Created(e) => serde_json::to_value(e),
            UserEvent::ProfileUpdated(e) => serde_json::to_value(e),
            UserEvent::Deactivated(e) => serde_json::to_value(e),
            UserEvent::Reactivated(e) => serde_json::to_value(e),
        }
    }
}
