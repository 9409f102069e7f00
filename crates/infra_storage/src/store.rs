//! File store over a local upload directory

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StorageError;

/// Upload limit used when none is configured (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
const EVIDENCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "pdf"];

/// What an upload is for; decides its directory and accepted types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadCategory {
    /// `foto` on the profile form
    ProfilePhoto,
    /// `foto` on the report form
    ReportPhoto,
    /// `bukti` attached when an admin approves a claim
    ClaimEvidence,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 3] = [
        UploadCategory::ProfilePhoto,
        UploadCategory::ReportPhoto,
        UploadCategory::ClaimEvidence,
    ];

    /// Sub-directory under the upload root
    pub fn dir(&self) -> &'static str {
        match self {
            UploadCategory::ProfilePhoto => "profil",
            UploadCategory::ReportPhoto => "laporan",
            UploadCategory::ClaimEvidence => "bukti",
        }
    }

    /// Lower-case extensions accepted for this category
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadCategory::ProfilePhoto | UploadCategory::ReportPhoto => IMAGE_EXTENSIONS,
            UploadCategory::ClaimEvidence => EVIDENCE_EXTENSIONS,
        }
    }
}

/// Local directory holding every upload
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_bytes: usize,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root and category directories
    pub async fn init(&self) -> Result<(), StorageError> {
        for category in UploadCategory::ALL {
            fs::create_dir_all(self.root.join(category.dir())).await?;
        }
        info!(root = %self.root.display(), "Upload directories ready");
        Ok(())
    }

    /// Stores `bytes` under a fresh random name and returns the relative path
    ///
    /// The extension is taken from `original_name` and must be allowed for
    /// `category`.
    pub async fn save(
        &self,
        category: UploadCategory,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::EmptyFile);
        }
        if bytes.len() > self.max_bytes {
            return Err(StorageError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }
        let extension = extension_of(original_name)
            .filter(|ext| category.allowed_extensions().contains(&ext.as_str()))
            .ok_or_else(|| StorageError::UnsupportedType(original_name.to_string()))?;

        let dir = self.root.join(category.dir());
        fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{extension}", Uuid::new_v4());
        fs::write(dir.join(&file_name), bytes).await?;

        let relative = format!("{}/{file_name}", category.dir());
        debug!(path = %relative, size = bytes.len(), "Upload stored");
        Ok(relative)
    }

    /// Deletes a stored file; a file that is already gone is not an error
    pub async fn remove(&self, relative: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %relative, "Upload removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %relative, "Upload already absent");
                Ok(())
            }
            Err(e) => {
                warn!(path = %relative, error = %e, "Failed to remove upload");
                Err(e.into())
            }
        }
    }

    /// Returns true if the stored file exists
    pub async fn exists(&self, relative: &str) -> Result<bool, StorageError> {
        let path = self.resolve(relative)?;
        Ok(fs::try_exists(path).await?)
    }

    /// Maps a stored relative path to a location inside the root
    ///
    /// Absolute paths and any `..` or root components are refused.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(relative);
        let safe = !relative.is_empty()
            && candidate
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(candidate))
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(extension_of("FOTO.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("noext"), None);
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let store = FileStore::new("/srv/uploads", DEFAULT_MAX_UPLOAD_BYTES);
        assert!(store.resolve("../etc/passwd").is_err());
        assert!(store.resolve("/etc/passwd").is_err());
        assert!(store.resolve("laporan/../../x").is_err());
        assert!(store.resolve("").is_err());
        assert_eq!(
            store.resolve("laporan/a.jpg").unwrap(),
            PathBuf::from("/srv/uploads/laporan/a.jpg")
        );
    }

    #[test]
    fn test_pdf_only_for_evidence() {
        assert!(UploadCategory::ClaimEvidence.allowed_extensions().contains(&"pdf"));
        assert!(!UploadCategory::ReportPhoto.allowed_extensions().contains(&"pdf"));
    }
}
