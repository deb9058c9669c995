//! Impersonation aggregate family events.
//!
//! Starting an impersonation session is a destructive-grade operation: the
//! emission layer requires a justification for `impersonation.started`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use orgspine_core::{SessionId, UserId};

use crate::{DecodeError, TypedEvent};

pub const IMPERSONATION_STARTED: &str = "impersonation.started";
pub const IMPERSONATION_ENDED: &str = "impersonation.ended";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpersonationStarted {
    pub session_id: SessionId,
    pub admin_id: UserId,
    pub target_user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpersonationEnded {
    pub session_id: SessionId,
}

/// All impersonation events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImpersonationEvent {
    Started(ImpersonationStarted),
    Ended(ImpersonationEnded),
}

impl TypedEvent for ImpersonationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ImpersonationEvent::Started(_) => IMPERSONATION_STARTED,
            ImpersonationEvent::Ended(_) => IMPERSONATION_ENDED,
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let payload = |e| DecodeError::payload(event_type, e);
        match event_type {
            IMPERSONATION_STARTED => serde_json::from_value(data.clone())
                .map(ImpersonationEvent::Started)
                .map_err(payload),
            IMPERSONATION_ENDED => serde_json::from_value(data.clone())
                .map(ImpersonationEvent::Ended)
                .map_err(payload),
            _ => Err(DecodeError::UnknownType(event_type.to_string())),
        }
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            ImpersonationEvent::Started(e) => serde_json::to_value(e),
            ImpersonationEvent::Ended(e) => serde_json::to_value(e),
        }
    }
}
