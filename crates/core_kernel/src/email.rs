//! Email natural key
//!
//! Users are identified by their email address, and reports and claims refer
//! back to their owners by that same address. `Email` normalizes the address
//! (trimmed, lower-cased) so that `Budi@Kampus.ac.id` and `budi@kampus.ac.id`
//! are the same key everywhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Longest address accepted (RFC 5321 path limit)
const MAX_LEN: usize = 254;

/// A validated, normalized email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidEmail` if the address is empty, too long,
    /// contains whitespace, or lacks a local part or a dotted domain.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() || normalized.len() > MAX_LEN {
            return Err(CoreError::InvalidEmail(raw.to_string()));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidEmail(raw.to_string()));
        }

        let (local, domain) = normalized
            .split_once('@')
            .ok_or_else(|| CoreError::InvalidEmail(raw.to_string()))?;

        let domain_ok = !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains("..");

        if local.is_empty() || !domain_ok {
            return Err(CoreError::InvalidEmail(raw.to_string()));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized address
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain part (after `@`)
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, d)| d).unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> String {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
