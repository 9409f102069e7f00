//! Event bus tests

use chrono::{Days, Utc};

use core_kernel::{Actor, Email};
use domain_report::{Laporan, ReportDraft, ReportKind};
use infra_notify::{EventBus, ReportEvent};

fn admin() -> Actor {
    Actor::admin(Email::parse("admin@kampus.ac.id").unwrap())
}

fn report() -> Laporan {
    let today = Utc::now().date_naive();
    let draft = ReportDraft {
        item_name: "Kunci motor".to_string(),
        kind: ReportKind::Found,
        location: "Parkiran FT".to_string(),
        event_date: today - Days::new(1),
        description: "Gantungan kunci biru".to_string(),
        photo: None,
    };
    let owner = Actor::user(Email::parse("budi@kampus.ac.id").unwrap());
    Laporan::submit(&owner, draft, today).unwrap()
}

#[tokio::test]
async fn test_subscribers_receive_published_events() {
    let bus = EventBus::new(8);
    let mut first = bus.subscribe();
    let mut second = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 2);

    let report = report();
    bus.publish(ReportEvent::created(&report));

    let expected = ReportEvent::created(&report);
    assert_eq!(first.recv().await.unwrap(), expected);
    assert_eq!(second.recv().await.unwrap(), expected);
}

#[test]
fn test_publish_without_subscribers_is_harmless() {
    let bus = EventBus::default();
    bus.publish(ReportEvent::created(&report()));
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn test_event_serializes_with_type_tag() {
    let report = report();
    let value = serde_json::to_value(ReportEvent::created(&report)).unwrap();

    assert_eq!(value["type"], "created");
    assert_eq!(value["payload"]["item_name"], "Kunci motor");
    assert_eq!(value["payload"]["kind"], "found");
    assert_eq!(value["payload"]["status"], "pending_verification");
    assert_eq!(value["payload"]["report_id"], report.id.to_string());
}

#[tokio::test]
async fn test_lagging_subscriber_skips_missed_events() {
    let bus = EventBus::new(1);
    let mut slow = bus.subscribe();

    bus.publish(ReportEvent::created(&report()));
    bus.publish(ReportEvent::created(&report()));

    assert!(matches!(
        slow.recv().await,
        Err(tokio::sync::broadcast::error::RecvError::Lagged(1))
    ));
    assert!(slow.recv().await.is_ok());
}

#[test]
fn test_pending_reports_reach_admins_only() {
    let student = Actor::user(Email::parse("siti@kampus.ac.id").unwrap());
    let mut report = report();

    let submitted = ReportEvent::created(&report);
    assert!(submitted.visible_to(&admin()));
    assert!(!submitted.visible_to(&student));

    report.approve(&admin()).unwrap();
    let listed = ReportEvent::listed(&report);
    assert_eq!(listed.name(), "report_listed");
    assert!(listed.visible_to(&student));
    assert!(listed.visible_to(&admin()));
}
