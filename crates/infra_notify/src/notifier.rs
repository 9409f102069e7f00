//! Fire-and-forget email notifications

use std::sync::Arc;

use tracing::{error, warn};

use core_kernel::Email;

use crate::error::NotifyError;
use crate::mailer::{Mailer, OutgoingEmail};
use crate::templates::EmailTemplates;

/// Renders notification emails and delivers them on background tasks
///
/// Every method returns immediately. Rendering or delivery failures are
/// logged and otherwise ignored; nothing is retried.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    templates: Arc<EmailTemplates>,
    base_url: String,
}

impl Notifier {
    /// `base_url` is the public origin used in links, e.g. `https://silapor.kampus.ac.id`
    pub fn new(mailer: Arc<dyn Mailer>, templates: EmailTemplates, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            mailer,
            templates: Arc::new(templates),
            base_url,
        }
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/verify-email?token={token}", self.base_url)
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={token}", self.base_url)
    }

    pub fn verification(&self, to: &Email, name: &str, token: &str) {
        let body = self.templates.verification(name, &self.verification_link(token));
        self.dispatch(to, "Verifikasi Email SILAPOR", body);
    }

    pub fn password_reset(&self, to: &Email, name: &str, token: &str, ttl_minutes: i64) {
        let body = self
            .templates
            .password_reset(name, &self.reset_link(token), ttl_minutes);
        self.dispatch(to, "Atur Ulang Password SILAPOR", body);
    }

    pub fn report_verified(&self, to: &Email, item_name: &str) {
        let body = self.templates.report_verified(item_name);
        self.dispatch(to, "Laporan Anda telah diverifikasi", body);
    }

    pub fn report_rejected(&self, to: &Email, item_name: &str, reason: &str) {
        let body = self.templates.report_rejected(item_name, reason);
        self.dispatch(to, "Laporan Anda ditolak", body);
    }

    pub fn claim_approved(&self, to: &Email, item_name: &str) {
        let body = self.templates.claim_approved(item_name);
        self.dispatch(to, "Klaim Anda disetujui", body);
    }

    pub fn claim_rejected(&self, to: &Email, item_name: &str, reason: &str) {
        let body = self.templates.claim_rejected(item_name, reason);
        self.dispatch(to, "Klaim Anda ditolak", body);
    }

    /// Tells a report owner that someone claimed their item
    pub fn new_claim(&self, owner: &Email, item_name: &str, claimant: &Email) {
        let body = self.templates.new_claim(item_name, claimant.as_str());
        self.dispatch(owner, "Klaim baru pada laporan Anda", body);
    }

    fn dispatch(&self, to: &Email, subject: &str, body: Result<String, NotifyError>) {
        let html = match body {
            Ok(html) => html,
            Err(e) => {
                error!(to = %to, subject, error = %e, "Failed to render email");
                return;
            }
        };

        let email = OutgoingEmail {
            to: to.clone(),
            subject: subject.to_string(),
            html,
        };
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&email).await {
                warn!(to = %email.to, subject = %email.subject, error = %e, "Email delivery failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::mock::RecordingMailer;
    use std::time::Duration;

    fn notifier(mailer: &RecordingMailer) -> Notifier {
        Notifier::new(
            Arc::new(mailer.clone()),
            EmailTemplates::new().unwrap(),
            "https://silapor.test/",
        )
    }

    fn budi() -> Email {
        Email::parse("budi@kampus.ac.id").unwrap()
    }

    #[test]
    fn test_links_use_trimmed_base_url() {
        let notifier = notifier(&RecordingMailer::new());
        assert_eq!(
            notifier.verification_link("abc"),
            "https://silapor.test/verify-email?token=abc"
        );
        assert_eq!(
            notifier.reset_link("xyz"),
            "https://silapor.test/reset-password?token=xyz"
        );
    }

    #[tokio::test]
    async fn test_verification_email_is_delivered() {
        let mailer = RecordingMailer::new();
        notifier(&mailer).verification(&budi(), "Budi", "abc123");

        let sent = mailer.wait_for(1, Duration::from_secs(2)).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, budi());
        assert_eq!(sent[0].subject, "Verifikasi Email SILAPOR");
        assert!(sent[0].html.contains("verify-email?token=abc123"));
    }

    #[tokio::test]
    async fn test_rejection_carries_reason() {
        let mailer = RecordingMailer::new();
        notifier(&mailer).claim_rejected(&budi(), "Payung hitam", "Ciri tidak sesuai");

        let sent = mailer.wait_for(1, Duration::from_secs(2)).await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("Ciri tidak sesuai"));
        assert!(sent[0].html.contains("Payung hitam"));
    }

    struct FailingMailer;

    #[async_trait::async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: &OutgoingEmail) -> Result<(), NotifyError> {
            Err(NotifyError::Transport("relay down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_propagate() {
        let notifier = Notifier::new(
            Arc::new(FailingMailer),
            EmailTemplates::new().unwrap(),
            "https://silapor.test",
        );
        notifier.report_verified(&budi(), "Dompet");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
