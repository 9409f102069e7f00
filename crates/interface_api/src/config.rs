//! API configuration
//!
//! Every field can be set through a `SILAPOR_`-prefixed environment
//! variable, e.g. `SILAPOR_PORT=8080` or `SILAPOR_SMTP_HOST=smtp.kampus.ac.id`.

use serde::Deserialize;

use infra_notify::SmtpConfig;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for session tokens
    pub jwt_secret: String,
    /// Session lifetime in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// Log level
    pub log_level: String,
    /// Directory holding uploaded files
    pub upload_dir: String,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
    /// Public origin used in email links
    pub public_base_url: String,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    /// SMTP relay; when unset, emails are only logged
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub smtp_starttls: bool,
    /// Admin account created at startup if it does not exist yet
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 60 * 60 * 24,
            database_url: "postgres://localhost/silapor".to_string(),
            database_max_connections: 10,
            log_level: "info".to_string(),
            upload_dir: "uploads".to_string(),
            max_upload_bytes: infra_storage::DEFAULT_MAX_UPLOAD_BYTES,
            public_base_url: "http://localhost:8080".to_string(),
            cookie_secure: false,
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "SILAPOR <noreply@localhost>".to_string(),
            smtp_starttls: true,
            admin_email: None,
            admin_password: None,
            admin_name: "Administrator".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("SILAPOR").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// SMTP settings, if a relay is configured
    pub fn smtp(&self) -> Option<SmtpConfig> {
        self.smtp_host.as_ref().map(|host| SmtpConfig {
            host: host.clone(),
            port: self.smtp_port,
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            from: self.smtp_from.clone(),
            starttls: self.smtp_starttls,
        })
    }

    /// Request body cap: the upload limit plus room for the other form fields
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes + 64 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert!(config.smtp().is_none());
        assert!(config.body_limit() > config.max_upload_bytes);
    }

    #[test]
    fn test_smtp_settings_follow_host() {
        let config = ApiConfig {
            smtp_host: Some("smtp.kampus.ac.id".to_string()),
            smtp_username: Some("silapor".to_string()),
            ..ApiConfig::default()
        };
        let smtp = config.smtp().unwrap();
        assert_eq!(smtp.host, "smtp.kampus.ac.id");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.username.as_deref(), Some("silapor"));
    }
}
