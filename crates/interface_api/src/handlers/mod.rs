//! Request handlers
//!
//! Path ids accept both the bare UUID and the prefixed display form
//! (`LAP-...`, `KLM-...`).

pub mod admin;
pub mod auth;
pub mod claims;
pub mod events;
pub mod health;
pub mod mahasiswa;
pub mod profile;
pub mod reports;

use core_kernel::{ClaimId, ReportId};

use crate::error::ApiError;

pub(crate) fn report_id(raw: &str) -> Result<ReportId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Laporan tidak ditemukan".to_string()))
}

pub(crate) fn claim_id(raw: &str) -> Result<ClaimId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Klaim tidak ditemukan".to_string()))
}
