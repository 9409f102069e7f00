//! Notification Infrastructure
//!
//! Two outbound channels:
//!
//! - **Email**: [`Notifier`] renders a [`EmailTemplates`] body and hands it
//!   to a [`Mailer`] on a background task. Delivery failures are logged and
//!   never reach the request that triggered them.
//! - **Events**: [`EventBus`] broadcasts [`ReportEvent`]s to connected
//!   server-sent-event streams.

pub mod error;
pub mod mailer;
pub mod templates;
pub mod notifier;
pub mod events;

pub use error::NotifyError;
pub use mailer::{LogMailer, Mailer, OutgoingEmail, SmtpConfig, SmtpMailer};
pub use templates::EmailTemplates;
pub use notifier::Notifier;
pub use events::{EventBus, ReportEvent, ReportSummary, DEFAULT_EVENT_CAPACITY};
#[cfg(any(test, feature = "mock"))]
pub use mailer::mock::RecordingMailer;
