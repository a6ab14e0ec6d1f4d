//! MinIO/S3-compatible storage client
//!
//! Holds submission files (private prefix) and transparency documents
//! (public prefix). Uses rust-s3 for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;
use crate::modules::storage::FileStore;

/// Which prefix an object lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileVisibility {
    Public,
    Private,
}

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    presigned_url_expiry_secs: u32,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    private_prefix: String,
}

impl MinIOClient {
    pub async fn new(config: StorageConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Storage(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs (http://endpoint/bucket) for MinIO
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
            presigned_url_expiry_secs: config.presigned_url_expiry_secs,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix,
            private_prefix: config.private_prefix,
        };

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}",
            client.endpoint,
            client.bucket.name()
        );

        Ok(client)
    }

    /// Create the bucket if it is missing. Failures are logged, not fatal.
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let created = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match created {
            Ok(_) => {
                info!("Bucket '{}' created", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    pub fn generate_key(&self, visibility: FileVisibility, path: &str) -> String {
        object_key(
            match visibility {
                FileVisibility::Public => &self.public_prefix,
                FileVisibility::Private => &self.private_prefix,
            },
            path,
        )
    }

    /// Same object path under the prefix for `visibility`
    pub fn with_visibility(&self, key: &str, visibility: FileVisibility) -> String {
        let path = [&self.public_prefix, &self.private_prefix]
            .into_iter()
            .find_map(|prefix| key.strip_prefix(&format!("{}/", prefix.trim_matches('/'))))
            .unwrap_or(key);
        self.generate_key(visibility, path)
    }

    pub async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", key, e)))?;
        check_status(response.status_code(), "upload", key)?;

        debug!("Uploaded '{}' ({} bytes)", key, data.len());
        Ok(())
    }

    pub async fn download(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to download '{}': {}", key, e)))?;
        check_status(response.status_code(), "download", key)?;

        Ok(response.to_vec())
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete '{}': {}", key, e)))?;
        check_status(response.status_code(), "delete", key)?;

        debug!("Deleted '{}'", key);
        Ok(())
    }

    /// Server-side copy to `to`, then delete `from`
    pub async fn move_object(&self, from: &str, to: &str) -> Result<(), AppError> {
        if from == to {
            return Ok(());
        }
        let status = self
            .bucket
            .copy_object_internal(from, to)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to copy '{}' to '{}': {}", from, to, e)))?;
        check_status(status, "copy", from)?;
        self.delete(from).await
    }

    /// Time-limited download URL
    pub async fn presigned_url(&self, key: &str) -> Result<String, AppError> {
        self.bucket
            .presign_get(key, self.presigned_url_expiry_secs, None)
            .await
            .map_err(|e| {
                AppError::Storage(format!("Failed to presign '{}': {}", key, e))
            })
    }

    /// Stable URL stored in the database for an object
    pub fn file_url(&self, key: &str) -> String {
        let endpoint = if key.starts_with(&format!("{}/", self.public_prefix)) {
            &self.public_endpoint
        } else {
            &self.endpoint
        };
        format!("{}/{}/{}", endpoint, self.bucket.name(), key)
    }

    /// Map a URL produced by [`file_url`](Self::file_url) back to its key
    pub fn extract_key_from_url(&self, url: &str) -> Option<String> {
        let bucket = self.bucket.name();
        [&self.public_endpoint, &self.endpoint]
            .into_iter()
            .find_map(|endpoint| strip_object_prefix(url, endpoint, &bucket))
    }
}

#[async_trait]
impl FileStore for MinIOClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let key = self
            .extract_key_from_url(url)
            .ok_or_else(|| AppError::NotFound(format!("'{}' is not a stored file", url)))?;
        self.download(&key).await
    }
}

/// Bucket calls hand back non-2xx responses as data
fn check_status(status: u16, action: &str, key: &str) -> Result<(), AppError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(AppError::NotFound(format!("Object '{}' not found", key))),
        _ => Err(AppError::Storage(format!(
            "Failed to {} '{}': HTTP {}",
            action, key, status
        ))),
    }
}

fn object_key(prefix: &str, path: &str) -> String {
    format!("{}/{}", prefix.trim_matches('/'), path.trim_start_matches('/'))
}

fn strip_object_prefix(url: &str, endpoint: &str, bucket: &str) -> Option<String> {
    url.strip_prefix(&format!("{}/{}/", endpoint, bucket))
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_joins_with_single_slash() {
        assert_eq!(
            object_key("private/", "/submissions/a.pdf"),
            "private/submissions/a.pdf"
        );
    }

    #[test]
    fn test_error_statuses_are_not_success() {
        assert!(check_status(200, "download", "a.pdf").is_ok());
        assert!(check_status(204, "delete", "a.pdf").is_ok());
        assert!(matches!(
            check_status(404, "download", "a.pdf"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            check_status(403, "upload", "a.pdf"),
            Err(AppError::Storage(_))
        ));
        assert!(matches!(
            check_status(500, "copy", "a.pdf"),
            Err(AppError::Storage(_))
        ));
    }

    #[test]
    fn test_strip_object_prefix() {
        assert_eq!(
            strip_object_prefix(
                "http://minio:9000/files/private/a.pdf",
                "http://minio:9000",
                "files"
            )
            .as_deref(),
            Some("private/a.pdf")
        );
        assert!(strip_object_prefix("http://other/files/a.pdf", "http://minio:9000", "files")
            .is_none());
        assert!(strip_object_prefix("http://minio:9000/files/", "http://minio:9000", "files")
            .is_none());
    }

    #[tokio::test]
    async fn test_file_urls_map_back_to_keys() {
        let storage = crate::shared::test_helpers::test_storage().await;

        let private = storage.generate_key(FileVisibility::Private, "submissions/a.pdf");
        assert_eq!(private, "private/submissions/a.pdf");
        let url = storage.file_url(&private);
        assert_eq!(url, "http://localhost:9000/reportwell-test/private/submissions/a.pdf");
        assert_eq!(storage.extract_key_from_url(&url).as_deref(), Some(private.as_str()));

        let public = storage.generate_key(FileVisibility::Public, "documents/b.pdf");
        let url = storage.file_url(&public);
        assert!(url.starts_with("http://files.localhost/"));
        assert_eq!(storage.extract_key_from_url(&url), Some(public));

        assert!(storage.extract_key_from_url("https://elsewhere/x.pdf").is_none());

        assert_eq!(
            storage.with_visibility(&private, FileVisibility::Public),
            "public/submissions/a.pdf"
        );
        assert_eq!(
            storage.with_visibility("public/documents/b.pdf", FileVisibility::Private),
            "private/documents/b.pdf"
        );
    }
}
