//! Mail transports
//!
//! [`SmtpMailer`] delivers through an SMTP relay with lettre. [`LogMailer`]
//! only logs, for development setups without a relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use tracing::{info, instrument};

use core_kernel::Email;

use crate::error::NotifyError;

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Email,
    pub subject: String,
    pub html: String,
}

/// Delivers rendered messages
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError>;
}

/// SMTP relay settings
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `From` header, e.g. `SILAPOR <noreply@kampus.ac.id>`
    pub from: String,
    /// Upgrade the connection with STARTTLS
    #[serde(default = "default_starttls")]
    pub starttls: bool,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

/// Sends mail through an SMTP relay
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = config.from.parse()?;

        let mut builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        info!(host = %config.host, port = config.port, "SMTP mailer configured");
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        let to: Mailbox = email.to.as_str().parse()?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())?;

        self.transport.send(message).await?;
        info!("Email sent");
        Ok(())
    }
}

/// Logs messages instead of sending them
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        info!(to = %email.to, subject = %email.subject, "Email delivery disabled; message logged");
        Ok(())
    }
}

/// Mailer that records messages for assertions
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Debug, Clone, Default)]
    pub struct RecordingMailer {
        sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().await.clone()
        }

        /// Waits until at least `count` messages were recorded
        ///
        /// Delivery happens on spawned tasks, so tests poll for it. Returns
        /// whatever was recorded once the timeout elapses.
        pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<OutgoingEmail> {
            let deadline = tokio::time::Instant::now() + timeout;
            loop {
                let sent = self.sent().await;
                if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                    return sent;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
            self.sent.lock().await.push(email.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(from: &str) -> SmtpConfig {
        SmtpConfig {
            host: "smtp.kampus.ac.id".to_string(),
            port: 2525,
            username: Some("silapor".to_string()),
            password: Some("rahasia".to_string()),
            from: from.to_string(),
            starttls: false,
        }
    }

    #[tokio::test]
    async fn test_smtp_mailer_builds_from_config() {
        assert!(SmtpMailer::new(&config("SILAPOR <noreply@kampus.ac.id>")).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_from_address_rejected() {
        let err = SmtpMailer::new(&config("not an address")).err();
        assert!(matches!(err, Some(NotifyError::Address(_))));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let email = OutgoingEmail {
            to: Email::parse("budi@kampus.ac.id").unwrap(),
            subject: "Halo".to_string(),
            html: "<p>Halo</p>".to_string(),
        };
        assert!(LogMailer.send(&email).await.is_ok());
    }
}
