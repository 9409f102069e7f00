//! Storage errors

use thiserror::Error;

/// Errors raised while storing or removing uploads
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File kosong")]
    EmptyFile,

    #[error("Ukuran file melebihi batas ({size} > {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Tipe file tidak didukung: {0}")]
    UnsupportedType(String),

    #[error("Path tidak valid: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Errors caused by the uploaded content rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(self, StorageError::Io(_))
    }
}
