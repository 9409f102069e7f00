//! Server-sent report events

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Extension,
};
use futures::{Stream, StreamExt};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, warn};

use core_kernel::Actor;
use infra_notify::ReportEvent;

use crate::AppState;

/// Streams report events the signed-in actor may see
pub async fn report_events(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.events.subscribe();
    debug!(
        subscribers = state.events.subscriber_count(),
        actor = %actor.email,
        "Event stream opened"
    );

    let stream = visible_events(receiver, actor).filter_map(|event| async move {
        match Event::default().event(event.name()).json_data(&event) {
            Ok(sse) => Some(Ok(sse)),
            Err(e) => {
                warn!(error = %e, "Failed to encode event");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Events from `receiver` that `actor` is allowed to see
fn visible_events(
    mut receiver: Receiver<ReportEvent>,
    actor: Actor,
) -> impl Stream<Item = ReportEvent> {
    async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(event) if event.visible_to(&actor) => yield event,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event stream lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Utc};
    use core_kernel::Email;
    use domain_report::{Laporan, ReportDraft, ReportKind};
    use infra_notify::EventBus;

    fn submitted(item_name: &str) -> Laporan {
        let today = Utc::now().date_naive();
        let draft = ReportDraft {
            item_name: item_name.to_string(),
            kind: ReportKind::Lost,
            location: "Kantin".to_string(),
            event_date: today - Days::new(1),
            description: "Warna hitam".to_string(),
            photo: None,
        };
        let owner = Actor::user(Email::parse("andi@kampus.ac.id").unwrap());
        Laporan::submit(&owner, draft, today).unwrap()
    }

    #[tokio::test]
    async fn test_student_stream_skips_pending_reports() {
        let bus = EventBus::default();
        let admin = Actor::admin(Email::parse("admin@kampus.ac.id").unwrap());
        let student = Actor::user(Email::parse("budi@kampus.ac.id").unwrap());
        let mut for_student = Box::pin(visible_events(bus.subscribe(), student));
        let mut for_admin = Box::pin(visible_events(bus.subscribe(), admin.clone()));

        let pending = submitted("Payung");
        let mut verified = submitted("Jaket");
        verified.approve(&admin).unwrap();
        bus.publish(ReportEvent::created(&pending));
        bus.publish(ReportEvent::listed(&verified));

        let first = for_student.next().await.unwrap();
        assert_eq!(first.name(), "report_listed");
        assert_eq!(first.summary().item_name, "Jaket");

        assert_eq!(for_admin.next().await.unwrap().summary().item_name, "Payung");
        assert_eq!(for_admin.next().await.unwrap().summary().item_name, "Jaket");
    }
}
