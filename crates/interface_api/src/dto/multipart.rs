//! Multipart form reading
//!
//! Upload forms mix text inputs with at most one file per field. The whole
//! form is buffered; the request body limit bounds its size.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::error::ApiError;

/// A file part of a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Buffered multipart form
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Reads every part of the form
    ///
    /// Parts carrying a file name are files; a file input left empty by the
    /// browser (no name, no content) is treated as absent.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| read_error(e, "form"))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| read_error(e, "berkas"))?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| read_error(e, "form"))?;
                    form.texts.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Text value, `None` if the input was not sent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Text value that must be present and non-blank
    pub fn required(&self, name: &str, message: &str) -> Result<&str, ApiError> {
        self.text(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::field(name, message))
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub(crate) fn with_texts(pairs: &[(&str, &str)]) -> Self {
        Self {
            texts: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

/// Body-limit failures keep their 413; anything else is a malformed form
fn read_error(error: MultipartError, what: &str) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Ukuran berkas melebihi batas".to_string())
    } else {
        ApiError::BadRequest(format!("Gagal membaca {what}: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_and_reports_field() {
        let form = MultipartForm::with_texts(&[("lokasi", "  Gedung A "), ("deskripsi", "  ")]);
        assert_eq!(form.required("lokasi", "Lokasi wajib diisi").unwrap(), "Gedung A");
        match form.required("deskripsi", "Deskripsi wajib diisi") {
            Err(ApiError::Validation { fields, .. }) => assert!(fields.contains_key("deskripsi")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(form.required("nama_barang", "Nama barang wajib diisi").is_err());
    }
}
