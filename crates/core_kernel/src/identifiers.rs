//! Report and claim identifiers
//!
//! Reports and claims are keyed by time-ordered UUIDs (v7) wrapped in
//! newtypes so a claim id can never be passed where a report id is expected.
//! Users are keyed by email instead, see [`crate::Email`].
//!
//! Ids display with a short prefix (`LAP-…`, `KLM-…`). Parsing accepts the
//! prefixed form or a bare UUID, so links built from either keep working.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh id; later ids sort after earlier ones
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps a UUID read back from storage
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let raw = trimmed
                    .strip_prefix(concat!($prefix, "-"))
                    .unwrap_or(trimmed);
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| CoreError::InvalidId(s.to_string()))
            }
        }
    };
}

define_id!(
    /// Identifies a lost or found item report (laporan)
    ReportId,
    "LAP"
);
define_id!(
    /// Identifies a claim against a report
    ClaimId,
    "KLM"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_id_display() {
        let id = ReportId::generate();
        assert!(id.to_string().starts_with("LAP-"));
    }

    #[test]
    fn test_prefixed_and_bare_parsing() {
        let id = ClaimId::generate();
        assert_eq!(id.to_string().parse::<ClaimId>().unwrap(), id);
        assert_eq!(id.as_uuid().to_string().parse::<ClaimId>().unwrap(), id);
    }

    #[test]
    fn test_wrong_prefix_is_rejected() {
        let id = ReportId::generate();
        let err = id.to_string().parse::<ClaimId>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidId(_)));
    }

    #[test]
    fn test_generated_ids_are_ordered() {
        let first = ReportId::generate();
        let second = ReportId::generate();
        assert!(first < second);
    }
}
