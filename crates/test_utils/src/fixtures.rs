//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for unit tests. Random variants use `fake`
//! for realistic names and addresses.

use chrono::{NaiveDate, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::name::en::Name;
use fake::Fake;
use once_cell::sync::Lazy;

use core_kernel::{Actor, Email};
use domain_report::{ReportDraft, ReportKind};
use domain_user::hash_password;

/// Password shared by every fixture account
pub const FIXTURE_PASSWORD: &str = "rahasia123";

/// Hash of [`FIXTURE_PASSWORD`], computed once per test binary
pub static FIXTURE_PASSWORD_HASH: Lazy<String> = Lazy::new(|| {
    hash_password(FIXTURE_PASSWORD).unwrap_or_else(|e| panic!("fixture hash failed: {e}"))
});

/// Fixture emails and actors
pub struct EmailFixtures;

impl EmailFixtures {
    pub fn admin() -> Email {
        Self::parse("admin@kampus.ac.id")
    }

    /// Reporter in most scenarios
    pub fn owner() -> Email {
        Self::parse("andi@kampus.ac.id")
    }

    /// Claimant in most scenarios
    pub fn claimant() -> Email {
        Self::parse("budi@kampus.ac.id")
    }

    /// Competing claimant
    pub fn other_claimant() -> Email {
        Self::parse("citra@kampus.ac.id")
    }

    /// Unique address for tests that need many accounts
    pub fn numbered(n: usize) -> Email {
        Self::parse(&format!("mahasiswa{n}@kampus.ac.id"))
    }

    fn parse(raw: &str) -> Email {
        Email::parse(raw).unwrap_or_else(|e| panic!("bad fixture email {raw}: {e}"))
    }
}

pub struct ActorFixtures;

impl ActorFixtures {
    pub fn admin() -> Actor {
        Actor::admin(EmailFixtures::admin())
    }

    pub fn owner() -> Actor {
        Actor::user(EmailFixtures::owner())
    }

    pub fn claimant() -> Actor {
        Actor::user(EmailFixtures::claimant())
    }

    pub fn other_claimant() -> Actor {
        Actor::user(EmailFixtures::other_claimant())
    }
}

/// Fixture dates
pub struct DateFixtures;

impl DateFixtures {
    /// Date most fixture items were lost or found
    pub fn event_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default()
    }

    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Fixture strings
pub struct StringFixtures;

impl StringFixtures {
    pub fn item_name() -> &'static str {
        "Dompet kulit coklat"
    }

    pub fn location() -> &'static str {
        "Kantin Fakultas Teknik"
    }

    pub fn description() -> &'static str {
        "Berisi KTM dan kartu ATM, ditemukan di bawah meja"
    }

    pub fn claim_description() -> &'static str {
        "KTM di dalamnya atas nama saya"
    }

    pub fn rejection_reason() -> &'static str {
        "Foto barang tidak jelas"
    }

    /// Random person name
    pub fn person_name() -> String {
        Name().fake()
    }

    /// Random street address
    pub fn address() -> String {
        format!("Jl. {}", StreetName().fake::<String>())
    }
}

pub struct DraftFixtures;

impl DraftFixtures {
    /// A valid found-item draft
    pub fn found() -> ReportDraft {
        ReportDraft {
            item_name: StringFixtures::item_name().to_string(),
            kind: ReportKind::Found,
            location: StringFixtures::location().to_string(),
            event_date: DateFixtures::event_date(),
            description: StringFixtures::description().to_string(),
            photo: None,
        }
    }

    /// A valid lost-item draft
    pub fn lost() -> ReportDraft {
        ReportDraft {
            kind: ReportKind::Lost,
            ..Self::found()
        }
    }
}
