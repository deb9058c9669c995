//! Audit value objects: who did it, and why.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::UserId;
use crate::value_object::ValueObject;

/// Minimum length for a human-readable justification.
pub const MIN_JUSTIFICATION_LEN: usize = 10;

/// The identity performing an operation.
///
/// Separate from `UserId` use elsewhere: an actor may act on their own behalf
/// or while impersonating another user, and the audit trail records both.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    /// Set when the operation runs under an impersonation session.
    pub impersonated_by: Option<UserId>,
}

impl Actor {
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            impersonated_by: None,
        }
    }

    pub fn impersonated(user_id: UserId, admin: UserId) -> Self {
        Self {
            user_id,
            impersonated_by: Some(admin),
        }
    }
}

impl ValueObject for Actor {}

/// A free-text reason attached to a mutating operation.
///
/// Destructive operations (deactivation, revocation, removal) must carry one;
/// the minimum length keeps "x" and "." out of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Justification(String);

impl Justification {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.len() < MIN_JUSTIFICATION_LEN {
            return Err(DomainError::validation(format!(
                "justification must be at least {MIN_JUSTIFICATION_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Justification {}

impl core::fmt::Display for Justification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Justification {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Justification> for String {
    fn from(value: Justification) -> Self {
        value.0
    }
}
