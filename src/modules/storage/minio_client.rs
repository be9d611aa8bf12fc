//! MinIO/S3-compatible storage client
//!
//! Uses rust-s3 without `fail-on-err`, so every response status is checked
//! here and mapped to `AppError::Storage`.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::BlobStore;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
}

impl MinIOClient {
    pub fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}",
            config.endpoint,
            bucket.name()
        );

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
        })
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(response) if response.success() => {
                info!("Bucket '{}' created successfully", self.bucket.name());
            }
            Ok(response) => {
                // 409 BucketAlreadyOwnedByYou lands here
                debug!(
                    "Bucket '{}' not created (status {}), assuming it exists",
                    self.bucket.name(),
                    response.response_code
                );
            }
            Err(e) => {
                warn!(
                    "Could not create bucket '{}' at {}: {}. Assuming it exists.",
                    self.bucket.name(),
                    self.endpoint,
                    e
                );
            }
        }
        Ok(())
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
impl BlobStore for MinIOClient {
    async fn download(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let response = self.bucket.get_object(path).await.map_err(|e| {
            tracing::error!("Failed to download '{}': {}", path, e);
            AppError::Storage(format!("Failed to download file: {}", e))
        })?;

        let status = response.status_code();
        if !is_success(status) {
            tracing::error!("Download of '{}' returned status {}", path, status);
            return Err(AppError::Storage(format!(
                "Failed to download file: status {}",
                status
            )));
        }

        debug!("Downloaded '{}' from bucket '{}'", path, self.bucket.name());
        Ok(response.to_vec())
    }

    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let response = self
            .bucket
            .put_object_with_content_type(path, &data, content_type)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upload '{}': {}", path, e);
                AppError::Storage(format!("Failed to upload file: {}", e))
            })?;

        let status = response.status_code();
        if !is_success(status) {
            tracing::error!("Upload of '{}' returned status {}", path, status);
            return Err(AppError::Storage(format!(
                "Failed to upload file: status {}",
                status
            )));
        }

        debug!("Uploaded '{}' to bucket '{}'", path, self.bucket.name());
        Ok(path.to_string())
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let response = self.bucket.delete_object(path).await.map_err(|e| {
            tracing::error!("Failed to delete '{}': {}", path, e);
            AppError::Storage(format!("Failed to delete file: {}", e))
        })?;

        let status = response.status_code();
        if !is_success(status) && status != 404 {
            return Err(AppError::Storage(format!(
                "Failed to delete file: status {}",
                status
            )));
        }

        debug!("Deleted '{}' from bucket '{}'", path, self.bucket.name());
        Ok(())
    }
}
