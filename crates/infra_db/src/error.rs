//! Database error types
//!
//! SQLx errors are classified by SQLSTATE. Violations of the schema's named
//! constraints carry the user-facing message for that constraint, so the
//! repositories can propagate them with `?` and callers see e.g. "Email
//! sudah terdaftar" instead of a Postgres message.

use thiserror::Error;

use core_kernel::PortError;

/// Unique index allowing one pending claim per claimant per report
pub const PENDING_CLAIM_INDEX: &str = "uq_claims_pending_per_claimant";

/// Primary key of `users`, i.e. the email
pub const USERS_PKEY: &str = "users_pkey";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Record not found")]
    RowNotFound,

    /// 23505
    #[error("{0}")]
    DuplicateEntry(String),

    /// 23503
    #[error("{0}")]
    ForeignKeyViolation(String),

    /// 23514
    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored value no longer parses into its domain type
    #[error("Corrupt {column} column: {message}")]
    CorruptRow { column: &'static str, message: String },
}

impl DatabaseError {
    pub fn corrupt(column: &'static str, message: impl std::fmt::Display) -> Self {
        DatabaseError::CorruptRow {
            column,
            message: message.to_string(),
        }
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Message for a unique violation on `constraint`
fn duplicate_message(constraint: Option<&str>) -> String {
    match constraint {
        Some(USERS_PKEY) => "Email sudah terdaftar".to_string(),
        Some(PENDING_CLAIM_INDEX) => "Klaim untuk laporan ini sudah diajukan".to_string(),
        Some(other) => format!("Duplicate value for {other}"),
        None => "Duplicate value".to_string(),
    }
}

/// Message for a foreign key violation on `constraint`
fn missing_reference_message(constraint: Option<&str>) -> String {
    match constraint {
        Some(name) if name.starts_with("claims_report_id") => "Laporan tidak ditemukan".to_string(),
        Some(_) | None => "Akun tidak ditemukan".to_string(),
    }
}

impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::RowNotFound,
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let constraint = db_err.constraint();
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(duplicate_message(constraint)),
                    Some("23503") => {
                        DatabaseError::ForeignKeyViolation(missing_reference_message(constraint))
                    }
                    Some("23514") => DatabaseError::CheckViolation(
                        constraint.unwrap_or("unnamed").to_string(),
                    ),
                    _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

/// Maps an owned SQLx error through the SQLSTATE table
pub(crate) fn map_sqlx(error: sqlx::Error) -> DatabaseError {
    DatabaseError::from(&error)
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::RowNotFound => PortError::not_found("Record", "requested"),
            DatabaseError::DuplicateEntry(message) => PortError::conflict(message),
            DatabaseError::ForeignKeyViolation(message) => PortError::invalid(message),
            DatabaseError::ConnectionFailed(message) => PortError::unavailable(message),
            DatabaseError::PoolExhausted => PortError::unavailable("Connection pool exhausted"),
            other => PortError::internal_from(other),
        }
    }
}
