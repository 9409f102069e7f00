//! User account repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, Email, PortError, Role};
use domain_user::{User, UserPort};

use super::email_column;
use crate::error::map_sqlx;

const USER_COLUMNS: &str = r#"
    email, name, password_hash, role, phone, address, photo, is_verified,
    verification_token, reset_token, reset_token_expires_at, created_at, updated_at
"#;

/// PostgreSQL-backed [`UserPort`]
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, PortError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.map(User::try_from).transpose()
    }
}

impl DomainPort for PgUserRepository {}

#[async_trait]
impl UserPort for PgUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PortError> {
        self.find_one("email", email.as_str()).await
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, PortError> {
        self.find_one("verification_token", token).await
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, PortError> {
        self.find_one("reset_token", token).await
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, user: &User) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                email, name, password_hash, role, phone, address, photo, is_verified,
                verification_token, reset_token, reset_token_expires_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(DbRole::from(user.role))
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.photo)
        .bind(user.is_verified)
        .bind(&user.verification_token)
        .bind(&user.reset_token)
        .bind(user.reset_token_expires_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        debug!("User inserted");
        Ok(())
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn save(&self, user: &User) -> Result<(), PortError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = $2, password_hash = $3, role = $4, phone = $5, address = $6,
                photo = $7, is_verified = $8, verification_token = $9, reset_token = $10,
                reset_token_expires_at = $11, updated_at = $12
            WHERE email = $1
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(DbRole::from(user.role))
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.photo)
        .bind(user.is_verified)
        .bind(&user.verification_token)
        .bind(&user.reset_token)
        .bind(user.reset_token_expires_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(PortError::not_found("User", &user.email));
        }
        Ok(())
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, PortError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE ($1::user_role IS NULL OR role = $1) \
             ORDER BY created_at DESC, email"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(role.map(DbRole::from))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.into_iter().map(User::try_from).collect()
    }
}

/// Mirror of the `user_role` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum DbRole {
    Admin,
    User,
}

impl From<Role> for DbRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => DbRole::Admin,
            Role::User => DbRole::User,
        }
    }
}

impl From<DbRole> for Role {
    fn from(role: DbRole) -> Self {
        match role {
            DbRole::Admin => Role::Admin,
            DbRole::User => Role::User,
        }
    }
}

/// Database row for a user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: DbRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo: Option<String>,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = PortError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            email: email_column(row.email)?,
            name: row.name,
            password_hash: row.password_hash,
            role: row.role.into(),
            phone: row.phone,
            address: row.address,
            photo: row.photo,
            is_verified: row.is_verified,
            verification_token: row.verification_token,
            reset_token: row.reset_token,
            reset_token_expires_at: row.reset_token_expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
