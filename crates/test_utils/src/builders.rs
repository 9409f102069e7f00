//! Test Data Builders
//!
//! Builders with sensible defaults so a test only states what it cares
//! about. Reports and claims are produced by running the real domain
//! operations, so a built record is always one the application could have
//! reached.

use chrono::{NaiveDate, Utc};

use core_kernel::{Actor, Email, Role};
use domain_claims::{Claim, ClaimStatus, Evidence};
use domain_report::{Laporan, ReportDraft, ReportKind, ReportStatus};
use domain_user::{NewUser, User};

use crate::fixtures::{
    ActorFixtures, DraftFixtures, EmailFixtures, StringFixtures, FIXTURE_PASSWORD_HASH,
};

/// Builder for user accounts
pub struct TestUserBuilder {
    email: Email,
    name: String,
    role: Role,
    verified: bool,
    phone: Option<String>,
    address: Option<String>,
    password_hash: Option<String>,
}

impl Default for TestUserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUserBuilder {
    /// A verified student account
    pub fn new() -> Self {
        Self {
            email: EmailFixtures::owner(),
            name: StringFixtures::person_name(),
            role: Role::User,
            verified: true,
            phone: Some("081234567890".to_string()),
            address: Some(StringFixtures::address()),
            password_hash: None,
        }
    }

    pub fn with_email(mut self, email: Email) -> Self {
        self.email = email;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn admin(mut self) -> Self {
        self.role = Role::Admin;
        self
    }

    pub fn unverified(mut self) -> Self {
        self.verified = false;
        self
    }

    pub fn with_phone(mut self, phone: Option<&str>) -> Self {
        self.phone = phone.map(str::to_string);
        self
    }

    /// Overrides the shared fixture password hash
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    pub fn build(self) -> User {
        let password_hash = self
            .password_hash
            .unwrap_or_else(|| FIXTURE_PASSWORD_HASH.clone());

        if self.role == Role::Admin {
            return User::admin(self.email, self.name, password_hash);
        }

        let mut user = User::register(NewUser {
            email: self.email,
            name: self.name,
            password_hash,
            phone: self.phone,
            address: self.address,
        })
        .unwrap_or_else(|e| panic!("fixture user is invalid: {e}"));

        if self.verified {
            if let Some(token) = user.verification_token.clone() {
                user.verify_email(&token)
                    .unwrap_or_else(|e| panic!("fixture verification failed: {e}"));
            }
        }
        user
    }
}

/// Builder for reports in any status
pub struct TestReportBuilder {
    owner: Actor,
    draft: ReportDraft,
    status: ReportStatus,
}

impl Default for TestReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestReportBuilder {
    /// A listed (on-progress) found-item report owned by the fixture owner
    pub fn new() -> Self {
        Self {
            owner: ActorFixtures::owner(),
            draft: DraftFixtures::found(),
            status: ReportStatus::OnProgress,
        }
    }

    pub fn with_owner(mut self, owner: Email) -> Self {
        self.owner = Actor::user(owner);
        self
    }

    pub fn with_item_name(mut self, name: impl Into<String>) -> Self {
        self.draft.item_name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: ReportKind) -> Self {
        self.draft.kind = kind;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.draft.location = location.into();
        self
    }

    pub fn with_event_date(mut self, date: NaiveDate) -> Self {
        self.draft.event_date = date;
        self
    }

    pub fn with_photo(mut self, path: impl Into<String>) -> Self {
        self.draft.photo = Some(path.into());
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = status;
        self
    }

    /// Submits the draft and walks the lifecycle to the requested status
    pub fn build(self) -> Laporan {
        let admin = ActorFixtures::admin();
        let mut report = Laporan::submit(&self.owner, self.draft, Utc::now().date_naive())
            .unwrap_or_else(|e| panic!("fixture draft is invalid: {e}"));

        let steps = match self.status {
            ReportStatus::PendingVerification => Ok(()),
            ReportStatus::OnProgress => report.approve(&admin),
            ReportStatus::Rejected => report.reject(&admin, StringFixtures::rejection_reason()),
            ReportStatus::Cancelled => report.cancel(&self.owner),
            ReportStatus::Claimed => report.approve(&admin).and_then(|_| report.mark_claimed()),
            ReportStatus::Done => report
                .approve(&admin)
                .and_then(|_| report.mark_claimed())
                .and_then(|_| report.complete(&admin)),
        };
        steps.unwrap_or_else(|e| panic!("cannot reach {}: {e}", self.status));
        report
    }
}

/// Builder for claims in any status
///
/// The parent report must be claimable when the claim is built.
pub struct TestClaimBuilder {
    claimant: Actor,
    description: String,
    status: ClaimStatus,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// A pending claim by the fixture claimant
    pub fn new() -> Self {
        Self {
            claimant: ActorFixtures::claimant(),
            description: StringFixtures::claim_description().to_string(),
            status: ClaimStatus::Pending,
        }
    }

    pub fn with_claimant(mut self, claimant: Email) -> Self {
        self.claimant = Actor::user(claimant);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    /// Files the claim against `report` and applies the requested decision
    ///
    /// Only the claim changes; use the workflow functions when the report
    /// should move too.
    pub fn build(self, report: &Laporan) -> Claim {
        let admin = ActorFixtures::admin();
        let mut claim = Claim::file(report, &[], &self.claimant, &self.description)
            .unwrap_or_else(|e| panic!("fixture claim is invalid: {e}"));

        let step = match self.status {
            ClaimStatus::Pending => Ok(()),
            ClaimStatus::Cancelled => claim.cancel(&self.claimant),
            ClaimStatus::Rejected => claim.reject(&admin, StringFixtures::rejection_reason()),
            ClaimStatus::Approved => Evidence::new("bukti/fixture.jpg")
                .and_then(|evidence| claim.approve(&admin, Some(evidence))),
        };
        step.unwrap_or_else(|e| panic!("cannot reach {}: {e}", self.status.as_str()));
        claim
    }
}
