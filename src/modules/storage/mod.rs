//! Blob storage for uploaded source files
//!
//! `BlobStore` is the seam the pipeline and upload flow depend on;
//! `MinIOClient` is the S3-compatible implementation used in production.

mod minio_client;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use minio_client::MinIOClient;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the raw bytes stored at `path`
    async fn download(&self, path: &str) -> Result<Vec<u8>, AppError>;

    /// Store `data` at `path`, returning the stored path
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;

    async fn delete(&self, path: &str) -> Result<(), AppError>;
}
