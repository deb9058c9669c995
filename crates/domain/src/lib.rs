//! `orgspine-domain` - typed event payloads per aggregate family.
//!
//! Every stream family has a closed enum of its event types. The dispatch
//! router decodes `(event_type, event_data)` into these enums, so an unknown
//! event type inside a known family is caught here, once, and treated as
//! fatal. The registry tests assert every variant maps to a distinct dotted
//! name and decodes back - missing handlers are caught in CI, not production.

pub mod contact;
pub mod grant;
pub mod impersonation;
pub mod link;
pub mod organization;
pub mod rbac;
pub mod registry;
pub mod schedule;
pub mod unit;
pub mod user;

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Why a `(event_type, event_data)` pair did not decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The event type is not in this family's registry. Fatal at dispatch.
    #[error("unknown event type '{0}'")]
    UnknownType(String),

    /// The type is known but the payload is malformed. Fatal at dispatch.
    #[error("payload for '{event_type}' is malformed: {message}")]
    Payload { event_type: String, message: String },
}

impl DecodeError {
    pub(crate) fn payload(event_type: &str, err: serde_json::Error) -> Self {
        Self::Payload {
            event_type: event_type.to_string(),
            message: err.to_string(),
        }
    }
}

/// A family's typed event enum.
pub trait TypedEvent: Sized {
    /// The dotted event-type name of this value.
    fn event_type(&self) -> &'static str;

    /// Decode from the stored wire form.
    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError>;

    /// Encode the payload back to the stored wire form.
    fn to_data(&self) -> Result<JsonValue, serde_json::Error>;
}
