use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    extension_for, is_mime_type_allowed, FileResponseDto, ALLOWED_MIME_TYPES,
};
use crate::features::files::models::{FileType, NewFile};
use crate::features::files::repositories::FileRepository;
use crate::features::quotas::models::Resource;
use crate::features::quotas::services::QuotaService;
use crate::modules::storage::BlobStore;
use crate::shared::constants::{MAX_FILE_SIZE, RECENT_FILES_LIMIT};

/// Upload, listing and removal of source files
pub struct FileService {
    repository: Arc<dyn FileRepository>,
    blob_store: Arc<dyn BlobStore>,
    quota_service: Arc<QuotaService>,
}

impl FileService {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        blob_store: Arc<dyn BlobStore>,
        quota_service: Arc<QuotaService>,
    ) -> Self {
        Self {
            repository,
            blob_store,
            quota_service,
        }
    }

    /// Store a new source file and create its `pending` row.
    ///
    /// The upload counter and storage bytes are charged together with the row insert.
    pub async fn upload(
        &self,
        user_id: Uuid,
        module_id: Uuid,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<FileResponseDto> {
        if data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }
        if !is_mime_type_allowed(content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_MIME_TYPES.join(", ")
            )));
        }

        let file_size = data.len() as i64;
        self.quota_service
            .ensure_can_consume(user_id, Resource::Uploads, 1)
            .await?;
        self.quota_service
            .ensure_can_consume(user_id, Resource::Storage, file_size)
            .await?;

        let id = Uuid::new_v4();
        let path = format!(
            "{}/{}/{}.{}",
            user_id,
            module_id,
            id,
            extension_for(file_name, content_type)
        );
        let content_hash = hex::encode(Sha256::digest(&data));

        let stored_path = self.blob_store.upload(&path, data, content_type).await?;
        debug!("Stored upload at {}", stored_path);

        let new_file = NewFile {
            id,
            user_id,
            module_id,
            file_name: file_name.to_string(),
            file_type: FileType::from_file_name(file_name),
            file_size,
            file_path: stored_path.clone(),
            mime_type: content_type.to_string(),
            content_hash,
        };

        let file = match self.repository.create(new_file).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.blob_store.delete(&stored_path).await {
                    tracing::error!(
                        "Failed to remove orphaned upload {}: {}",
                        stored_path,
                        cleanup
                    );
                }
                return Err(e);
            }
        };

        info!(
            file_id = %file.id,
            user_id = %user_id,
            size = file.file_size,
            "File uploaded"
        );

        Ok(file.into())
    }

    pub async fn list_recent(&self, user_id: Uuid) -> Result<Vec<FileResponseDto>> {
        let files = self
            .repository
            .list_recent(user_id, RECENT_FILES_LIMIT)
            .await?;
        Ok(files.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, file_id: Uuid, user_id: Uuid) -> Result<FileResponseDto> {
        self.repository
            .find_owned(file_id, user_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// Remove the row (artifacts cascade), then the blob.
    ///
    /// Usage counters are not refunded.
    pub async fn delete(&self, file_id: Uuid, user_id: Uuid) -> Result<()> {
        let file = self
            .repository
            .delete_owned(file_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if let Err(e) = self.blob_store.delete(&file.file_path).await {
            tracing::error!("Failed to delete blob {}: {}", file.file_path, e);
        }

        info!(file_id = %file_id, user_id = %user_id, "File deleted");
        Ok(())
    }
}
