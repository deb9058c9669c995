//! Event metadata: actor identity, justification, trace correlation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orgspine_core::{Actor, DomainError, Justification, SessionId};

/// Event types ending in one of these suffixes are destructive and must carry
/// a justification.
const JUSTIFIED_SUFFIXES: &[&str] = &[
    ".deactivated",
    ".deleted",
    ".revoked",
    ".removed",
    ".unassigned",
    ".unlinked",
];

/// Event types that must carry a justification regardless of suffix.
const JUSTIFIED_TYPES: &[&str] = &["impersonation.started"];

/// Metadata attached to every emitted event.
///
/// Correlation/session/trace identifiers are stored and indexed for an
/// external observability system to reconstruct causal chains; this core never
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub actor: Actor,
    /// Human-readable reason. Required for destructive event types.
    pub reason: Option<Justification>,
    pub correlation_id: Option<Uuid>,
    pub session_id: Option<SessionId>,
    pub trace_id: Option<String>,
}

impl EventMetadata {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            reason: None,
            correlation_id: None,
            session_id: None,
            trace_id: None,
        }
    }

    pub fn with_reason(mut self, reason: Justification) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_trace(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Structural precondition check, run before anything is persisted.
    pub fn validate_for(&self, event_type: &str) -> Result<(), DomainError> {
        if requires_justification(event_type) && self.reason.is_none() {
            return Err(DomainError::validation(format!(
                "event type '{event_type}' requires a justification"
            )));
        }
        Ok(())
    }
}

/// Whether an event type is destructive enough to demand a recorded reason.
pub fn requires_justification(event_type: &str) -> bool {
    JUSTIFIED_TYPES.contains(&event_type)
        || JUSTIFIED_SUFFIXES.iter().any(|s| event_type.ends_with(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgspine_core::UserId;

    #[test]
    fn destructive_types_require_a_reason() {
        assert!(requires_justification("organization.deactivated"));
        assert!(requires_justification("role.unassigned"));
        assert!(requires_justification("user.unit.unlinked"));
        assert!(requires_justification("impersonation.started"));
        assert!(!requires_justification("user.created"));
        assert!(!requires_justification("organization.renamed"));
    }

    #[test]
    fn validate_rejects_missing_justification() {
        let meta = EventMetadata::new(Actor::user(UserId::new()));
        assert!(meta.validate_for("contact.phone.removed").is_err());
        assert!(meta.validate_for("contact.phone.added").is_ok());

        let meta = meta.with_reason(Justification::new("number disconnected by carrier").unwrap());
        assert!(meta.validate_for("contact.phone.removed").is_ok());
    }
}
