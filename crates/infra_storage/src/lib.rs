//! Upload Storage
//!
//! Stores user uploads under a single root directory, one sub-directory per
//! [`UploadCategory`]. Stored files get random names; callers keep the
//! returned relative path (e.g. `laporan/0190c1f2-....jpg`) in the database
//! and hand it back to [`FileStore::remove`] when the record drops it.

pub mod error;
pub mod store;

pub use error::StorageError;
pub use store::{FileStore, UploadCategory, DEFAULT_MAX_UPLOAD_BYTES};
