//! User Accounts Domain
//!
//! Users register with their campus email, confirm it through a verification
//! link, and log in with a password. The email address is the natural key
//! that reports and claims refer back to.
//!
//! # Account Lifecycle
//!
//! ```text
//! register -> unverified --(verify_email)--> verified
//!                                   │
//!                     issue_reset_token / reset_password
//! ```
//!
//! Accounts are never deleted; token fields carry the soft states.

pub mod user;
pub mod password;
pub mod validation;
pub mod error;
pub mod ports;

pub use user::{User, NewUser, ProfileUpdate, RESET_TOKEN_TTL_MINUTES};
pub use password::{hash_password, verify_missing_account, verify_password};
pub use error::UserError;
pub use ports::UserPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockUserPort;
