//! SILAPOR - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! SILAPOR_DATABASE_URL=postgres://... SILAPOR_JWT_SECRET=... cargo run --bin silapor-api
//! ```
//!
//! # Environment Variables
//!
//! * `SILAPOR_HOST` / `SILAPOR_PORT` - bind address (default: 0.0.0.0:8080)
//! * `SILAPOR_JWT_SECRET` - session signing secret (required in production)
//! * `SILAPOR_DATABASE_URL` - PostgreSQL connection string
//! * `SILAPOR_DATABASE_MAX_CONNECTIONS` - pool size (default: 10)
//! * `SILAPOR_UPLOAD_DIR` - upload directory (default: uploads)
//! * `SILAPOR_PUBLIC_BASE_URL` - origin used in email links
//! * `SILAPOR_SMTP_HOST` - SMTP relay; emails are only logged when unset
//! * `SILAPOR_ADMIN_EMAIL` / `SILAPOR_ADMIN_PASSWORD` - bootstrap admin account
//! * `SILAPOR_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_db::{DatabaseConfig, PgClaimRepository, PgReportRepository, PgUserRepository};
use infra_notify::{EmailTemplates, EventBus, LogMailer, Mailer, Notifier, SmtpMailer};
use infra_storage::FileStore;
use interface_api::{config::ApiConfig, create_router, services::accounts, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting SILAPOR API server"
    );

    let pool = infra_db::create_pool(
        DatabaseConfig::new(&config.database_url).max_connections(config.database_max_connections),
    )
    .await
        .context("database connection failed")?;
    infra_db::migrate(&pool).await.context("database migration failed")?;

    let files = FileStore::new(&config.upload_dir, config.max_upload_bytes);
    files.init().await.context("upload directory unavailable")?;
    domain_user::password::warm_up();

    let mailer: Arc<dyn Mailer> = match config.smtp() {
        Some(smtp) => Arc::new(SmtpMailer::new(&smtp).context("invalid SMTP settings")?),
        None => {
            tracing::warn!("SILAPOR_SMTP_HOST not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };
    let templates = EmailTemplates::new().context("email templates failed to compile")?;
    let notifier = Notifier::new(mailer, templates, config.public_base_url.clone());

    let state = AppState {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        reports: Arc::new(PgReportRepository::new(pool.clone())),
        claims: Arc::new(PgClaimRepository::new(pool.clone())),
        files,
        notifier,
        events: EventBus::default(),
        pool: Some(pool),
        config: config.clone(),
    };

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        accounts::ensure_admin(state.users.as_ref(), email, &config.admin_name, password)
            .await
            .context("bootstrap admin could not be created")?;
    }

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM so in-flight requests can finish
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
