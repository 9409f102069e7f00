//! Database Test Utilities
//!
//! PostgreSQL test containers with the workspace migrations applied.
//! Tests using these helpers need a running Docker daemon.

use std::time::Duration;

use sqlx::PgPool;
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

use infra_db::{DatabaseConfig, PgClaimRepository, PgReportRepository, PgUserRepository};

/// PostgreSQL image tag used for tests
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "silapor";
const POSTGRES_PASSWORD: &str = "silapor_test";
const POSTGRES_DB: &str = "silapor_test";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    /// Creates the database connection URL
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A migrated PostgreSQL test container
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a container and applies the migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or a migration fails
    pub async fn new() -> Result<Self, BoxError> {
        let container = Postgres::default()
            .with_user(POSTGRES_USER)
            .with_password(POSTGRES_PASSWORD)
            .with_db_name(POSTGRES_DB)
            .with_tag(POSTGRES_TAG)
            .start()
            .await?;

        let config = TestDatabaseConfig {
            host: container.get_host().await?.to_string(),
            port: container.get_host_port_ipv4(5432.tcp()).await?,
            ..TestDatabaseConfig::default()
        };

        let pool = infra_db::create_pool(
            DatabaseConfig::new(config.connection_url())
                .max_connections(5)
                .min_connections(1)
                .connect_timeout(Duration::from_secs(30)),
        )
        .await?;
        infra_db::migrate(&pool).await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Clears all data while preserving the schema
    pub async fn clear_data(&self) -> Result<(), BoxError> {
        sqlx::query("TRUNCATE TABLE claims, laporan, users CASCADE")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// The three PostgreSQL repositories sharing one test pool
pub struct TestRepositories {
    pub users: PgUserRepository,
    pub reports: PgReportRepository,
    pub claims: PgClaimRepository,
}

impl TestDatabase {
    /// Repositories over this database's pool
    pub fn repositories(&self) -> TestRepositories {
        TestRepositories {
            users: PgUserRepository::new(self.pool.clone()),
            reports: PgReportRepository::new(self.pool.clone()),
            claims: PgClaimRepository::new(self.pool.clone()),
        }
    }
}
