//! Property-Based Test Generators
//!
//! Proptest strategies producing data that satisfies the domain's input
//! rules, so properties exercise behaviour rather than validation.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use core_kernel::{Actor, Email};
use domain_claims::ClaimStatus;
use domain_report::{ReportDraft, ReportKind, ReportStatus};

/// Campus email addresses, in mixed case to exercise normalization
pub fn email_strategy() -> impl Strategy<Value = Email> {
    ("[a-z][a-z0-9]{2,12}", prop::bool::ANY).prop_filter_map("valid email", |(local, upper)| {
        let raw = format!("{local}@kampus.ac.id");
        let raw = if upper { raw.to_uppercase() } else { raw };
        Email::parse(&raw).ok()
    })
}

/// Student actors
pub fn student_strategy() -> impl Strategy<Value = Actor> {
    email_strategy().prop_map(Actor::user)
}

pub fn report_kind_strategy() -> impl Strategy<Value = ReportKind> {
    prop_oneof![Just(ReportKind::Lost), Just(ReportKind::Found)]
}

pub fn report_status_strategy() -> impl Strategy<Value = ReportStatus> {
    prop::sample::select(ReportStatus::ALL.to_vec())
}

pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

/// Non-blank single-line text up to `max` characters
pub fn text_strategy(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Za-z0-9][A-Za-z0-9 ,.-]{{0,{}}}", max.saturating_sub(1)))
        .unwrap_or_else(|e| panic!("bad text regex: {e}"))
}

/// Dates within the last five years of `today`
pub fn past_date_strategy(today: NaiveDate) -> impl Strategy<Value = NaiveDate> {
    (0i64..5 * 365).prop_map(move |days_ago| today - Duration::days(days_ago))
}

/// Valid report drafts dated on or before `today`
pub fn draft_strategy(today: NaiveDate) -> impl Strategy<Value = ReportDraft> {
    (
        text_strategy(60),
        report_kind_strategy(),
        text_strategy(80),
        past_date_strategy(today),
        text_strategy(200),
    )
        .prop_map(|(item_name, kind, location, event_date, description)| ReportDraft {
            item_name,
            kind,
            location,
            event_date,
            description,
            photo: None,
        })
}

/// Phone numbers the registration rules accept
pub fn phone_strategy() -> impl Strategy<Value = String> {
    ("[0-9]{10,15}", prop::bool::ANY).prop_map(|(digits, plus)| {
        if plus {
            format!("+{digits}")
        } else {
            digits
        }
    })
}
