//! Stream families (aggregate families).

use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchError;

/// The closed set of aggregate families events can belong to.
///
/// Events are persisted with their family as a plain string (the wire form);
/// the dispatch router parses it into this enum before routing. An unknown
/// string is a configuration bug and fails dispatch loudly - it is never
/// skipped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    User,
    Organization,
    OrganizationUnit,
    Rbac,
    Schedule,
    Contact,
    AccessGrant,
    Impersonation,
    Relationship,
    /// Administrative signaling streams carry no projection at all.
    AdminSignal,
}

impl StreamType {
    pub const ALL: &'static [StreamType] = &[
        StreamType::User,
        StreamType::Organization,
        StreamType::OrganizationUnit,
        StreamType::Rbac,
        StreamType::Schedule,
        StreamType::Contact,
        StreamType::AccessGrant,
        StreamType::Impersonation,
        StreamType::Relationship,
        StreamType::AdminSignal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamType::User => "user",
            StreamType::Organization => "organization",
            StreamType::OrganizationUnit => "organization_unit",
            StreamType::Rbac => "rbac",
            StreamType::Schedule => "schedule",
            StreamType::Contact => "contact",
            StreamType::AccessGrant => "access_grant",
            StreamType::Impersonation => "impersonation",
            StreamType::Relationship => "relationship",
            StreamType::AdminSignal => "admin_signal",
        }
    }

    /// Parse the wire form. Unknown strings are fatal at dispatch time.
    pub fn parse(raw: &str) -> Result<StreamType, DispatchError> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str() == raw)
            .ok_or_else(|| DispatchError::UnrecognizedStream(raw.to_string()))
    }
}

impl core::fmt::Display for StreamType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_family() {
        for s in StreamType::ALL {
            assert_eq!(StreamType::parse(s.as_str()).unwrap(), *s);
        }
    }

    #[test]
    fn unknown_family_is_an_error() {
        let err = StreamType::parse("billing").unwrap_err();
        assert!(matches!(err, DispatchError::UnrecognizedStream(s) if s == "billing"));
    }
}
