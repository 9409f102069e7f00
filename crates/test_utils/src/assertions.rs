//! Custom Test Assertions
//!
//! Assertions for the report and claim invariants, with messages that name
//! the offending records.

use std::collections::HashSet;

use domain_claims::{Claim, ClaimStatus, Resolution};
use domain_report::{Laporan, ReportStatus};

/// Asserts a report's status
pub fn assert_report_status(report: &Laporan, expected: ReportStatus) {
    assert_eq!(
        report.status, expected,
        "Report {} ({}) is {}, expected {}",
        report.id, report.item_name, report.status, expected
    );
}

/// Asserts a claim's status
pub fn assert_claim_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status,
        expected,
        "Claim {} by {} is {}, expected {}",
        claim.id,
        claim.claimant,
        claim.status.as_str(),
        expected.as_str()
    );
}

/// Asserts that no claimant holds two pending claims on the same report
pub fn assert_one_pending_claim_per_claimant(claims: &[Claim]) {
    let mut seen = HashSet::new();
    for claim in claims.iter().filter(|c| c.is_pending()) {
        assert!(
            seen.insert((claim.report_id, claim.claimant.clone())),
            "{} holds more than one pending claim on report {}",
            claim.claimant,
            claim.report_id
        );
    }
}

/// Asserts that none of `claims` is still pending
pub fn assert_no_pending_claims(claims: &[Claim]) {
    let pending: Vec<String> = claims
        .iter()
        .filter(|c| c.is_pending())
        .map(|c| c.id.to_string())
        .collect();
    assert!(pending.is_empty(), "Claims still pending: {}", pending.join(", "));
}

/// Asserts that approved claims carry evidence and a deciding admin, and
/// rejected claims a reason
pub fn assert_decisions_complete(claims: &[Claim]) {
    for claim in claims {
        match claim.status {
            ClaimStatus::Approved => {
                assert!(claim.evidence.is_some(), "Approved claim {} has no evidence", claim.id);
                assert!(claim.decided_by.is_some(), "Approved claim {} has no decider", claim.id);
            }
            ClaimStatus::Rejected => {
                assert!(
                    claim.rejection_reason.is_some(),
                    "Rejected claim {} has no reason",
                    claim.id
                );
            }
            ClaimStatus::Pending | ClaimStatus::Cancelled => {}
        }
    }
}

/// Asserts that a resolution only touches claims of its own report and
/// leaves none of them pending
pub fn assert_resolution_consistent(resolution: &Resolution) {
    for claim in resolution.claims() {
        assert_eq!(
            claim.report_id, resolution.report.id,
            "Claim {} belongs to another report",
            claim.id
        );
    }
    let claims: Vec<Claim> = resolution.claims().cloned().collect();
    assert_no_pending_claims(&claims);
    assert_decisions_complete(&claims);
}
