//! Organization kind (feature gating vocabulary).

use serde::{Deserialize, Serialize};

/// Kind of an organization, used by downstream feature gating.
///
/// Stored on the organization row and echoed into session claims; this core
/// does not interpret it beyond carrying it around.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgKind {
    /// A paying customer organization.
    Customer,
    /// A partner organization administering customers on their behalf.
    Partner,
    /// An internal organization (support, operations).
    Internal,
}

impl core::fmt::Display for OrgKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OrgKind::Customer => f.write_str("customer"),
            OrgKind::Partner => f.write_str("partner"),
            OrgKind::Internal => f.write_str("internal"),
        }
    }
}
