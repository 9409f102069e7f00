//! User Domain Ports
//!
//! `UserPort` is everything the account workflows need from storage. The
//! PostgreSQL adapter lives in `infra_db`; an in-memory `MockUserPort` is
//! available behind the `mock` feature for service and HTTP tests.

use async_trait::async_trait;

use core_kernel::{DomainPort, Email, PortError, Role};

use crate::user::User;

/// Storage operations for user accounts
#[async_trait]
pub trait UserPort: DomainPort {
    /// Looks up an account by its email
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PortError>;

    /// Looks up the account holding an outstanding verification token
    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, PortError>;

    /// Looks up the account holding an outstanding reset token
    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, PortError>;

    /// Stores a new account
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if the email is already registered
    async fn insert(&self, user: &User) -> Result<(), PortError>;

    /// Persists changes to an existing account
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` if no account has this email
    async fn save(&self, user: &User) -> Result<(), PortError>;

    /// Lists accounts, optionally restricted to one role, newest first
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, PortError>;

    /// Like `find_by_email` but treats absence as an error
    async fn get(&self, email: &Email) -> Result<User, PortError> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| PortError::not_found("User", email))
    }
}

/// In-memory implementation for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of UserPort
    #[derive(Debug, Default, Clone)]
    pub struct MockUserPort {
        users: Arc<RwLock<HashMap<Email, User>>>,
    }

    impl MockUserPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with users for testing
        pub async fn with_users(users: Vec<User>) -> Self {
            let port = Self::new();
            {
                let mut map = port.users.write().await;
                for user in users {
                    map.insert(user.email.clone(), user);
                }
            }
            port
        }

        /// Number of stored accounts
        pub async fn len(&self) -> usize {
            self.users.read().await.len()
        }
    }

    impl DomainPort for MockUserPort {}

    #[async_trait]
    impl UserPort for MockUserPort {
        async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PortError> {
            Ok(self.users.read().await.get(email).cloned())
        }

        async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, PortError> {
            Ok(self
                .users
                .read()
                .await
                .values()
                .find(|u| u.verification_token.as_deref() == Some(token))
                .cloned())
        }

        async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, PortError> {
            Ok(self
                .users
                .read()
                .await
                .values()
                .find(|u| u.reset_token.as_deref() == Some(token))
                .cloned())
        }

        async fn insert(&self, user: &User) -> Result<(), PortError> {
            let mut users = self.users.write().await;
            if users.contains_key(&user.email) {
                return Err(PortError::conflict(format!(
                    "User with email '{}' already exists",
                    user.email
                )));
            }
            users.insert(user.email.clone(), user.clone());
            Ok(())
        }

        async fn save(&self, user: &User) -> Result<(), PortError> {
            let mut users = self.users.write().await;
            match users.get_mut(&user.email) {
                Some(existing) => {
                    *existing = user.clone();
                    Ok(())
                }
                None => Err(PortError::not_found("User", &user.email)),
            }
        }

        async fn list(&self, role: Option<Role>) -> Result<Vec<User>, PortError> {
            let users = self.users.read().await;
            let mut results: Vec<User> = users
                .values()
                .filter(|u| role.map_or(true, |r| u.role == r))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(results)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockUserPort;
    use super::*;
    use crate::user::NewUser;

    fn new_user(email: &str) -> User {
        User::register(NewUser {
            email: Email::parse(email).unwrap(),
            name: "Budi".to_string(),
            password_hash: "hash".to_string(),
            phone: None,
            address: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_mock_insert_rejects_duplicate_email() {
        let port = MockUserPort::new();
        port.insert(&new_user("budi@kampus.ac.id")).await.unwrap();

        let err = port.insert(&new_user("BUDI@kampus.ac.id")).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(port.len().await, 1);
    }

    #[tokio::test]
    async fn test_mock_find_by_tokens() {
        let mut user = new_user("siti@kampus.ac.id");
        let reset = user.issue_reset_token(chrono::Utc::now());
        let verification = user.verification_token.clone().unwrap();
        let port = MockUserPort::with_users(vec![user]).await;

        assert!(port.find_by_verification_token(&verification).await.unwrap().is_some());
        assert!(port.find_by_reset_token(&reset).await.unwrap().is_some());
        assert!(port.find_by_reset_token("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_save_requires_existing_account() {
        let port = MockUserPort::new();
        let err = port.save(&new_user("ghost@kampus.ac.id")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_mock_list_filters_by_role() {
        let admin = User::admin(Email::parse("admin@kampus.ac.id").unwrap(), "Admin", "h".into());
        let port = MockUserPort::with_users(vec![admin, new_user("budi@kampus.ac.id")]).await;

        assert_eq!(port.list(None).await.unwrap().len(), 2);
        let users = port.list(Some(Role::User)).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email.as_str(), "budi@kampus.ac.id");
    }
}
