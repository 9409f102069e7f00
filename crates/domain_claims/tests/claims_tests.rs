//! Tests for claims and the claim workflow

use chrono::{Days, Utc};
use proptest::prelude::*;

use core_kernel::{Actor, Email};
use domain_claims::{
    approve_claim, cancel_report, Claim, ClaimError, ClaimStatus, Evidence,
    REPORT_CANCELLED_REASON, SUPERSEDED_REASON,
};
use domain_report::{Laporan, ReportDraft, ReportKind, ReportStatus};

fn actor(email: &str) -> Actor {
    Actor::user(Email::parse(email).unwrap())
}

fn owner() -> Actor {
    actor("budi@kampus.ac.id")
}

fn claimant() -> Actor {
    actor("siti@kampus.ac.id")
}

fn second_claimant() -> Actor {
    actor("andi@kampus.ac.id")
}

fn admin() -> Actor {
    Actor::admin(Email::parse("admin@kampus.ac.id").unwrap())
}

fn listed_report() -> Laporan {
    let today = Utc::now().date_naive();
    let draft = ReportDraft {
        item_name: "Payung hitam".to_string(),
        kind: ReportKind::Found,
        location: "Kantin teknik".to_string(),
        event_date: today - Days::new(2),
        description: "Payung lipat merek lokal".to_string(),
        photo: None,
    };
    let mut report = Laporan::submit(&owner(), draft, today).unwrap();
    report.approve(&admin()).unwrap();
    report
}

fn evidence() -> Option<Evidence> {
    Some(Evidence::new("uploads/bukti/serah-terima.jpg").unwrap())
}

mod filing_tests {
    use super::*;

    #[test]
    fn test_claim_starts_pending() {
        let report = listed_report();
        let claim = Claim::file(&report, &[], &claimant(), "  Payung saya ada gantungan kunci  ").unwrap();

        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.report_id, report.id);
        assert_eq!(claim.claimant.as_str(), "siti@kampus.ac.id");
        assert_eq!(claim.description, "Payung saya ada gantungan kunci");
        assert!(claim.evidence.is_none());
    }

    #[test]
    fn test_unverified_report_cannot_be_claimed() {
        let mut report = listed_report();
        report.status = ReportStatus::PendingVerification;

        let err = Claim::file(&report, &[], &claimant(), "milik saya").unwrap_err();
        assert_eq!(err, ClaimError::ReportNotClaimable("pending_verification".to_string()));
    }

    #[test]
    fn test_owner_cannot_claim_own_report() {
        let report = listed_report();
        let err = Claim::file(&report, &[], &owner(), "milik saya").unwrap_err();
        assert_eq!(err, ClaimError::OwnReport);
    }

    #[test]
    fn test_description_required() {
        let report = listed_report();
        let err = Claim::file(&report, &[], &claimant(), "   ").unwrap_err();
        assert_eq!(err, ClaimError::DescriptionRequired);
    }

    #[test]
    fn test_one_pending_claim_per_user() {
        let report = listed_report();
        let first = Claim::file(&report, &[], &claimant(), "milik saya").unwrap();

        let err = Claim::file(&report, &[first.clone()], &claimant(), "milik saya juga").unwrap_err();
        assert_eq!(err, ClaimError::DuplicatePendingClaim);

        // Another user may still claim
        assert!(Claim::file(&report, &[first], &second_claimant(), "punya saya").is_ok());
    }

    #[test]
    fn test_can_reclaim_after_cancelling() {
        let report = listed_report();
        let mut first = Claim::file(&report, &[], &claimant(), "milik saya").unwrap();
        first.cancel(&claimant()).unwrap();

        assert!(Claim::file(&report, &[first], &claimant(), "milik saya").is_ok());
    }
}

mod decision_tests {
    use super::*;

    fn pending_claim() -> Claim {
        Claim::file(&listed_report(), &[], &claimant(), "milik saya").unwrap()
    }

    #[test]
    fn test_only_claimant_cancels() {
        let mut claim = pending_claim();
        assert!(matches!(claim.cancel(&second_claimant()), Err(ClaimError::NotAuthorized(_))));

        claim.cancel(&claimant()).unwrap();
        assert_eq!(claim.status, ClaimStatus::Cancelled);
    }

    #[test]
    fn test_approval_requires_admin_and_evidence() {
        let mut claim = pending_claim();
        assert!(matches!(claim.approve(&claimant(), evidence()), Err(ClaimError::NotAuthorized(_))));
        assert_eq!(claim.approve(&admin(), None), Err(ClaimError::EvidenceRequired));
        assert_eq!(claim.status, ClaimStatus::Pending);

        claim.approve(&admin(), evidence()).unwrap();
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.evidence.as_ref().map(Evidence::path), Some("uploads/bukti/serah-terima.jpg"));
        assert_eq!(claim.decided_by.as_ref().map(Email::as_str), Some("admin@kampus.ac.id"));
    }

    #[test]
    fn test_blank_evidence_path_rejected() {
        assert_eq!(Evidence::new("  "), Err(ClaimError::EvidenceRequired));
    }

    #[test]
    fn test_rejection_requires_reason() {
        let mut claim = pending_claim();
        assert_eq!(claim.reject(&admin(), " "), Err(ClaimError::ReasonRequired));

        claim.reject(&admin(), "Ciri-ciri tidak sesuai").unwrap();
        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert_eq!(claim.rejection_reason.as_deref(), Some("Ciri-ciri tidak sesuai"));
    }

    #[test]
    fn test_decided_claim_is_final() {
        let mut claim = pending_claim();
        claim.reject(&admin(), "Tidak sesuai").unwrap();

        assert!(matches!(
            claim.approve(&admin(), evidence()),
            Err(ClaimError::InvalidStatusTransition { .. })
        ));
        assert!(matches!(
            claim.cancel(&claimant()),
            Err(ClaimError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("approved".parse::<ClaimStatus>(), Ok(ClaimStatus::Approved));
        assert_eq!(
            "lost".parse::<ClaimStatus>(),
            Err(ClaimError::UnknownStatus("lost".to_string()))
        );
    }
}

mod workflow_tests {
    use super::*;

    #[test]
    fn test_approval_claims_report_and_supersedes_competitors() {
        let report = listed_report();
        let winner = Claim::file(&report, &[], &claimant(), "milik saya").unwrap();
        let loser = Claim::file(&report, &[], &second_claimant(), "punya saya").unwrap();

        let resolution = approve_claim(
            report,
            winner.clone(),
            vec![winner.clone(), loser.clone()],
            &admin(),
            evidence(),
        )
        .unwrap();

        assert_eq!(resolution.report.status, ReportStatus::Claimed);
        let decided = resolution.decided.as_ref().unwrap();
        assert_eq!(decided.id, winner.id);
        assert_eq!(decided.status, ClaimStatus::Approved);

        assert_eq!(resolution.affected.len(), 1);
        let superseded = &resolution.affected[0];
        assert_eq!(superseded.id, loser.id);
        assert_eq!(superseded.status, ClaimStatus::Rejected);
        assert_eq!(superseded.rejection_reason.as_deref(), Some(SUPERSEDED_REASON));
        assert_eq!(resolution.claims().count(), 2);
    }

    #[test]
    fn test_approval_needs_listed_report() {
        let mut report = listed_report();
        let claim = Claim::file(&report, &[], &claimant(), "milik saya").unwrap();
        report.mark_claimed().unwrap();

        let err = approve_claim(report, claim, vec![], &admin(), evidence()).unwrap_err();
        assert_eq!(err, ClaimError::ReportNotClaimable("claimed".to_string()));
    }

    #[test]
    fn test_approval_rejects_foreign_claim() {
        let report = listed_report();
        let other_report = listed_report();
        let claim = Claim::file(&other_report, &[], &claimant(), "milik saya").unwrap();

        let err = approve_claim(report, claim, vec![], &admin(), evidence()).unwrap_err();
        assert_eq!(err, ClaimError::ReportMismatch);
    }

    #[test]
    fn test_approval_without_evidence_changes_nothing() {
        let report = listed_report();
        let claim = Claim::file(&report, &[], &claimant(), "milik saya").unwrap();

        let err = approve_claim(report, claim, vec![], &admin(), None).unwrap_err();
        assert_eq!(err, ClaimError::EvidenceRequired);
    }

    #[test]
    fn test_cancelling_report_closes_pending_claims() {
        let report = listed_report();
        let pending = Claim::file(&report, &[], &claimant(), "milik saya").unwrap();
        let mut withdrawn = Claim::file(&report, &[], &second_claimant(), "punya saya").unwrap();
        withdrawn.cancel(&second_claimant()).unwrap();

        let resolution = cancel_report(report, vec![pending.clone(), withdrawn], &owner()).unwrap();

        assert_eq!(resolution.report.status, ReportStatus::Cancelled);
        assert!(resolution.decided.is_none());
        assert_eq!(resolution.affected.len(), 1);
        assert_eq!(resolution.affected[0].id, pending.id);
        assert_eq!(resolution.affected[0].status, ClaimStatus::Cancelled);
        assert_eq!(
            resolution.affected[0].rejection_reason.as_deref(),
            Some(REPORT_CANCELLED_REASON)
        );
    }

    #[test]
    fn test_only_owner_cancels_report() {
        let report = listed_report();
        let err = cancel_report(report, vec![], &claimant()).unwrap_err();
        assert!(matches!(err, ClaimError::Report(_)));
    }
}

proptest! {
    /// Exactly one claim is approved and no claim on the report stays pending
    #[test]
    fn prop_approval_leaves_no_pending_claims(count in 1usize..8, pick in 0usize..8) {
        let report = listed_report();
        let claims: Vec<Claim> = (0..count)
            .map(|i| {
                let who = actor(&format!("mhs{i}@kampus.ac.id"));
                Claim::file(&report, &[], &who, "milik saya").unwrap()
            })
            .collect();
        let chosen = claims[pick % count].clone();

        let resolution = approve_claim(report, chosen, claims.clone(), &admin(), evidence()).unwrap();

        prop_assert_eq!(resolution.claims().count(), count);
        prop_assert_eq!(
            resolution.claims().filter(|c| c.status == ClaimStatus::Approved).count(),
            1
        );
        prop_assert!(resolution.claims().all(|c| !c.is_pending()));
    }
}
