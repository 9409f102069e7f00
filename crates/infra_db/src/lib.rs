//! Infrastructure Database Layer
//!
//! PostgreSQL adapters for the domain ports, built on SQLx.
//!
//! # Architecture
//!
//! Each repository implements one domain port and maps between database
//! rows and domain types. Postgres enums (`user_role`, `report_kind`,
//! `report_status`, `claim_status`) have row-level mirrors deriving
//! `sqlx::Type`, so the domain crates stay free of SQLx.
//!
//! Users are keyed by email; reports and claims reference them through
//! that email.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, migrate, PgReportRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/silapor")).await?;
//! migrate(&pool).await?;
//! let reports = PgReportRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{DatabasePool, create_pool, migrate, ping, DatabaseConfig};
pub use error::{DatabaseError, PENDING_CLAIM_INDEX, USERS_PKEY};
pub use repositories::{PgClaimRepository, PgReportRepository, PgUserRepository};
