//! Roles and the acting principal
//!
//! Every state transition in the report and claim workflows is performed by an
//! [`Actor`]; the actor's [`Role`] decides which transitions are permitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::email::Email;
use crate::error::CoreError;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Campus staff who verify reports and decide claims
    Admin,
    /// Students and other registered reporters
    User,
}

impl Role {
    /// Returns the stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated principal performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub email: Email,
    pub role: Role,
}

impl Actor {
    pub fn new(email: Email, role: Role) -> Self {
        Self { email, role }
    }

    /// Shorthand for an admin principal
    pub fn admin(email: Email) -> Self {
        Self::new(email, Role::Admin)
    }

    /// Shorthand for a regular user principal
    pub fn user(email: Email) -> Self {
        Self::new(email, Role::User)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns true if `owner` is this actor's email
    pub fn owns(&self, owner: &Email) -> bool {
        &self.email == owner
    }
}
