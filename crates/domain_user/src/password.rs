//! Password hashing
//!
//! Passwords are stored as PHC strings produced by Argon2id with a random
//! salt. Verification parses the stored string, so hashes created with other
//! Argon2 parameters keep working.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::error::UserError;

/// Hash checked when no account matches, so a miss costs the same argon2
/// work as a wrong password
static MISSING_ACCOUNT_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("silapor-no-such-account").ok());

/// Hashes a plain-text password
pub fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

/// Checks a plain-text password against a stored hash
///
/// A malformed stored hash is treated as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            false
        }
    }
}

/// Runs a full verification for a login whose account does not exist
///
/// Always reports a mismatch.
pub fn verify_missing_account(password: &str) -> bool {
    if let Some(hash) = MISSING_ACCOUNT_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

/// Computes the missing-account hash ahead of the first login
pub fn warm_up() {
    Lazy::force(&MISSING_ACCOUNT_HASH);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("rahasia123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("rahasia123", &hash));
        assert!(!verify_password("salah", &hash));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("rahasia123").unwrap();
        let b = hash_password("rahasia123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_account_check_does_real_work_and_fails() {
        warm_up();
        let hash = MISSING_ACCOUNT_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!verify_missing_account("silapor-no-such-account"));
        assert!(!verify_missing_account("rahasia123"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
