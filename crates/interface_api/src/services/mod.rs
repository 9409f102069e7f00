//! Application services
//!
//! Each function runs one use case against the ports in [`crate::AppState`]:
//! load the aggregates, apply the domain operation, persist, then fire the
//! notifications. Handlers only translate HTTP in and out.

pub mod accounts;
pub mod reports;
pub mod claims;
