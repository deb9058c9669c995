//! Hierarchical scope paths (materialized paths).
//!
//! Every node of the organization tree carries its full position from the root
//! as a dot-separated path (`root.a.b`). Containment tests are string-prefix
//! checks on segment boundaries, so "node and all descendants" queries are a
//! single scan rather than a recursive walk.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Materialized path of a node in the organization hierarchy.
///
/// Segments are non-empty, lowercase `[a-z0-9_-]` strings joined by `.`.
/// The first segment is the organization root; each further segment is one
/// level of organization unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScopePath {
    raw: String,
}

impl ScopePath {
    /// Parse a path, validating every segment.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(DomainError::validation("scope path cannot be empty"));
        }
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(DomainError::validation(format!(
                    "scope path '{raw}' contains an empty segment"
                )));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
            {
                return Err(DomainError::validation(format!(
                    "scope path segment '{segment}' must be lowercase [a-z0-9_-]"
                )));
            }
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    /// The path as a dot-separated string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Iterate the path's segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.raw.split('.').count()
    }

    /// The root segment of this path.
    pub fn root(&self) -> &str {
        self.raw.split('.').next().unwrap_or(&self.raw)
    }

    /// Parent path, or `None` for a root.
    pub fn parent(&self) -> Option<ScopePath> {
        let idx = self.raw.rfind('.')?;
        Some(Self {
            raw: self.raw[..idx].to_string(),
        })
    }

    /// Append one segment, producing a child path.
    pub fn child(&self, segment: &str) -> Result<ScopePath, DomainError> {
        Self::parse(format!("{}.{}", self.raw, segment))
    }

    /// Ancestor-or-equal containment: `self` contains `other` when `other`
    /// is `self` or lives somewhere underneath it.
    ///
    /// Containment respects segment boundaries: `root.a` does not contain
    /// `root.ab`.
    pub fn contains(&self, other: &ScopePath) -> bool {
        if self.raw == other.raw {
            return true;
        }
        other.raw.starts_with(&self.raw)
            && other.raw.as_bytes().get(self.raw.len()) == Some(&b'.')
    }

    /// Strict ancestor test (`self` contains `other` and is not equal to it).
    pub fn is_ancestor_of(&self, other: &ScopePath) -> bool {
        self != other && self.contains(other)
    }

    /// All ancestors of this path, nearest first (excluding `self`).
    pub fn ancestors(&self) -> Vec<ScopePath> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(p) = current {
            current = p.parent();
            out.push(p);
        }
        out
    }

    /// Rebase `self` from under `from` to under `to`.
    ///
    /// Used when a subtree is moved: every descendant path swaps its `from`
    /// prefix for `to`. Returns `None` when `self` is not under `from`.
    pub fn rebase(&self, from: &ScopePath, to: &ScopePath) -> Option<ScopePath> {
        if !from.contains(self) {
            return None;
        }
        if self == from {
            return Some(to.clone());
        }
        let suffix = &self.raw[from.raw.len()..];
        Some(ScopePath {
            raw: format!("{}{}", to.raw, suffix),
        })
    }
}

impl ValueObject for ScopePath {}

impl core::fmt::Display for ScopePath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ScopePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ScopePath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ScopePath> for String {
    fn from(value: ScopePath) -> Self {
        value.raw
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
