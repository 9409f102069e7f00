//! In-process event bus
//!
//! Publishing never blocks. A subscriber that falls more than the channel
//! capacity behind skips the missed events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use core_kernel::Actor;
use domain_report::{Laporan, ReportStatus};

/// Buffered events per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Report fields carried by every event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub report_id: String,
    pub item_name: String,
    pub kind: String,
    pub location: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Laporan> for ReportSummary {
    fn from(report: &Laporan) -> Self {
        Self {
            report_id: report.id.to_string(),
            item_name: report.item_name.clone(),
            kind: report.kind.as_str().to_string(),
            location: report.location.clone(),
            status: report.status,
            created_at: report.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum ReportEvent {
    /// A report was submitted
    Created(ReportSummary),
    /// An admin verified a report; it is now publicly listed
    Listed(ReportSummary),
}

impl ReportEvent {
    pub fn created(report: &Laporan) -> Self {
        ReportEvent::Created(report.into())
    }

    pub fn listed(report: &Laporan) -> Self {
        ReportEvent::Listed(report.into())
    }

    pub fn summary(&self) -> &ReportSummary {
        match self {
            ReportEvent::Created(summary) | ReportEvent::Listed(summary) => summary,
        }
    }

    /// Admins see every report; everyone else only listed ones
    pub fn visible_to(&self, actor: &Actor) -> bool {
        actor.is_admin() || self.summary().status == ReportStatus::OnProgress
    }

    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            ReportEvent::Created(_) => "report_created",
            ReportEvent::Listed(_) => "report_listed",
        }
    }
}

/// Broadcast channel for [`ReportEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ReportEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: ReportEvent) {
        let name = event.name();
        match self.tx.send(event) {
            Ok(receivers) => debug!(event = name, receivers, "Event published"),
            Err(_) => debug!(event = name, "Event dropped, no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReportEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
