//! Rules shared by every endpoint that accepts a file.

use std::collections::HashMap;

use axum::extract::Multipart;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::error::AppError;

/// MIME types accepted for submission files and documents
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "text/csv",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Maximum file size in bytes (20MB)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

const MAX_SEGMENT_LEN: usize = 120;

/// A file read from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Enforce the size limit and the MIME allowlist
    pub fn validate(&self) -> Result<(), AppError> {
        if self.data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }

        if self.data.len() > MAX_FILE_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        if !ALLOWED_MIME_TYPES.contains(&self.content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                self.content_type,
                ALLOWED_MIME_TYPES.join(", ")
            )));
        }

        Ok(())
    }

    /// Lowercase hex SHA-256 of the contents
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }
}

/// Multipart form: the `file` part plus every other part as text
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();

            if name == "file" {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field
                    .file_name()
                    .map(sanitize_segment)
                    .unwrap_or_else(|| "unnamed".to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            } else {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
                })?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// The validated file part
    pub fn take_file(&mut self) -> Result<UploadedFile, AppError> {
        let file = self
            .file
            .take()
            .ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
        file.validate()?;
        Ok(file)
    }

    /// Non-blank text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Make a string safe to use as one path segment (object keys, zip entries)
pub fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_matches('.').trim();
    if trimmed.is_empty() {
        return "untitled".to_string();
    }

    trimmed.chars().take(MAX_SEGMENT_LEN).collect()
}

/// Last path segment of a stored file URL
pub fn file_name_from_url(url: &str) -> String {
    let last = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or("file");

    let decoded = urlencoding::decode(last)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| last.to_string());
    sanitize_segment(&decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: "plan.pdf".to_string(),
            content_type: content_type.to_string(),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn test_allowed_upload_passes() {
        assert!(upload("application/pdf", 10).validate().is_ok());
        assert!(upload("text/csv", 10).validate().is_ok());
    }

    #[test]
    fn test_disallowed_type_and_size() {
        assert!(upload("application/x-msdownload", 10).validate().is_err());
        assert!(upload("application/pdf", MAX_FILE_SIZE + 1).validate().is_err());
        assert!(upload("application/pdf", 0).validate().is_err());
    }

    #[test]
    fn test_checksum_is_sha256_hex() {
        let file = UploadedFile {
            file_name: "a.txt".to_string(),
            content_type: "text/csv".to_string(),
            data: b"abc".to_vec(),
        };
        assert_eq!(
            file.checksum(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("Budget: Q1/Q2"), "Budget_ Q1_Q2");
        assert_eq!(sanitize_segment("  ..  "), "untitled");
        assert_eq!(sanitize_segment("../etc"), "_etc");
        assert_eq!(sanitize_segment(&"x".repeat(300)).len(), 120);
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("http://minio:9000/files/private/submissions/abc/Safety%20Plan.pdf"),
            "Safety Plan.pdf"
        );
        assert_eq!(file_name_from_url("http://host/a/b.pdf?X-Amz=1"), "b.pdf");
    }
}
