//! Test harness: the full router over in-memory ports

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

use core_kernel::{Actor, Email, Role};
use domain_claims::{Claim, ClaimPort, MockClaimPort};
use domain_report::{Laporan, MockReportPort, ReportDraft, ReportKind, ReportPort};
use domain_user::{hash_password, MockUserPort, NewUser, User, UserPort};
use infra_notify::{EmailTemplates, EventBus, Notifier, RecordingMailer};
use infra_storage::{FileStore, DEFAULT_MAX_UPLOAD_BYTES};
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};

pub const PASSWORD: &str = "rahasia123";
pub const ADMIN: &str = "admin@kampus.ac.id";
pub const OWNER: &str = "andi@kampus.ac.id";
pub const CLAIMANT: &str = "budi@kampus.ac.id";
pub const OTHER_CLAIMANT: &str = "citra@kampus.ac.id";

// argon2 is slow in debug builds; every seeded account shares one hash
static PASSWORD_HASH: Lazy<String> = Lazy::new(|| hash_password(PASSWORD).unwrap());

pub struct TestApp {
    pub server: TestServer,
    pub users: MockUserPort,
    pub reports: MockReportPort,
    pub claims: MockClaimPort,
    pub mailer: RecordingMailer,
    pub events: EventBus,
    pub files: FileStore,
    pub config: ApiConfig,
    _uploads: TempDir,
}

impl TestApp {
    /// App with a verified admin and three verified students
    pub async fn new() -> Self {
        let uploads = TempDir::new().unwrap();
        let config = ApiConfig {
            jwt_secret: "test-secret".to_string(),
            upload_dir: uploads.path().display().to_string(),
            ..ApiConfig::default()
        };

        let users = MockUserPort::new();
        let reports = MockReportPort::new();
        let claims = MockClaimPort::new(reports.clone());
        let mailer = RecordingMailer::new();
        let events = EventBus::default();
        let files = FileStore::new(uploads.path(), DEFAULT_MAX_UPLOAD_BYTES);
        let notifier = Notifier::new(
            Arc::new(mailer.clone()),
            EmailTemplates::new().unwrap(),
            "http://silapor.test",
        );

        let state = AppState {
            config: config.clone(),
            users: Arc::new(users.clone()),
            reports: Arc::new(reports.clone()),
            claims: Arc::new(claims.clone()),
            files: files.clone(),
            notifier,
            events: events.clone(),
            pool: None,
        };
        let server = TestServer::new(create_router(state)).unwrap();

        let app = Self {
            server,
            users,
            reports,
            claims,
            mailer,
            events,
            files,
            config,
            _uploads: uploads,
        };

        let admin = User::admin(email(ADMIN), "Admin", PASSWORD_HASH.clone());
        app.users.insert(&admin).await.unwrap();
        for student in [OWNER, CLAIMANT, OTHER_CLAIMANT] {
            app.add_student(student, true).await;
        }
        app
    }

    pub async fn add_student(&self, address: &str, verified: bool) -> User {
        let mut user = User::register(NewUser {
            email: email(address),
            name: "Mahasiswa".to_string(),
            password_hash: PASSWORD_HASH.clone(),
            phone: Some("081234567890".to_string()),
            address: None,
        })
        .unwrap();
        if verified {
            let token = user.verification_token.clone().unwrap();
            user.verify_email(&token).unwrap();
        }
        self.users.insert(&user).await.unwrap();
        user
    }

    /// Session cookie header for `address` with `role`
    pub fn session(&self, address: &str, role: Role) -> (HeaderName, HeaderValue) {
        let actor = Actor::new(email(address), role);
        let token = create_token(&actor, &self.config.jwt_secret, 3600).unwrap();
        (
            header::COOKIE,
            HeaderValue::from_str(&format!("token={token}")).unwrap(),
        )
    }

    pub fn admin_session(&self) -> (HeaderName, HeaderValue) {
        self.session(ADMIN, Role::Admin)
    }

    pub fn student_session(&self, address: &str) -> (HeaderName, HeaderValue) {
        self.session(address, Role::User)
    }

    /// A verified (on-progress) report owned by `owner`
    pub async fn listed_report(&self, owner: &str, item: &str) -> Laporan {
        let mut report = self.pending_report(owner, item).await;
        report.approve(&Actor::admin(email(ADMIN))).unwrap();
        self.reports.save(&report).await.unwrap();
        report
    }

    /// A report waiting for verification
    pub async fn pending_report(&self, owner: &str, item: &str) -> Laporan {
        let report = Laporan::submit(&Actor::user(email(owner)), draft(item), Utc::now().date_naive()).unwrap();
        self.reports.insert(&report).await.unwrap();
        report
    }

    pub async fn pending_claim(&self, report: &Laporan, claimant: &str) -> Claim {
        let existing = self.claims.list_for_report(report.id).await.unwrap();
        let claim = Claim::file(report, &existing, &Actor::user(email(claimant)), "Ada stiker nama saya").unwrap();
        self.claims.insert(&claim).await.unwrap();
        claim
    }
}

pub fn email(address: &str) -> Email {
    Email::parse(address).unwrap()
}

pub fn draft(item: &str) -> ReportDraft {
    ReportDraft {
        item_name: item.to_string(),
        kind: ReportKind::Found,
        location: "Perpustakaan".to_string(),
        event_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        description: format!("{item} ditemukan di meja baca"),
        photo: None,
    }
}
