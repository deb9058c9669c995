//! Permission identifiers.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use orgspine_core::DomainError;

/// A leaf capability, keyed by (domain area, action).
///
/// Rendered as `area.action` (e.g. `users.manage`, `roles.assign`). There is
/// no wildcard: breadth comes from scope, not from permission globbing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    area: Cow<'static, str>,
    action: Cow<'static, str>,
}

impl Permission {
    pub fn new(
        area: impl Into<Cow<'static, str>>,
        action: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            area: area.into(),
            action: action.into(),
        }
    }

    /// Parse the `area.action` rendering.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.split_once('.') {
            Some((area, action)) if !area.is_empty() && !action.is_empty() => Ok(Self {
                area: Cow::Owned(area.to_string()),
                action: Cow::Owned(action.to_string()),
            }),
            _ => Err(DomainError::validation(format!(
                "permission '{raw}' must be 'area.action'"
            ))),
        }
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.area, self.action)
    }
}

impl TryFrom<String> for Permission {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}
