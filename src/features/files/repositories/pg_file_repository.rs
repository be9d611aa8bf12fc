use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::FileRepository;
use crate::core::error::{AppError, Result};
use crate::features::files::models::{File, FileType, NewFile, ProcessingStatus};
use crate::features::quotas::models::Resource;
use crate::features::quotas::repositories::{increment_usage, lock_counters};

pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Move a file to `to` only if its current status is an allowed source.
///
/// Every status write goes through here, including the one inside the
/// generation commit transaction.
pub async fn guarded_transition<'e, E>(
    executor: E,
    file_id: Uuid,
    user_id: Uuid,
    to: ProcessingStatus,
) -> std::result::Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sources: Vec<String> = ProcessingStatus::allowed_sources(to)
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();

    let result = sqlx::query!(
        r#"
        UPDATE files
        SET processing_status = $3, updated_at = NOW()
        WHERE id = $1
          AND user_id = $2
          AND processing_status::text = ANY($4)
        "#,
        file_id,
        user_id,
        to as ProcessingStatus,
        &sources[..]
    )
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find_owned(&self, file_id: Uuid, user_id: Uuid) -> Result<Option<File>> {
        sqlx::query_as!(
            File,
            r#"
            SELECT id, user_id, module_id, file_name,
                   file_type as "file_type: FileType",
                   file_size, file_path, mime_type, content_hash,
                   processing_status as "processing_status: ProcessingStatus",
                   created_at, updated_at
            FROM files
            WHERE id = $1 AND user_id = $2
            "#,
            file_id,
            user_id
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch file: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<File>> {
        sqlx::query_as!(
            File,
            r#"
            SELECT id, user_id, module_id, file_name,
                   file_type as "file_type: FileType",
                   file_size, file_path, mime_type, content_hash,
                   processing_status as "processing_status: ProcessingStatus",
                   created_at, updated_at
            FROM files
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            user_id,
            limit
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list files: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn create(&self, new_file: NewFile) -> Result<File> {
        let mut tx = self.pool.begin().await?;

        // The service checked both allowances already; recheck under the row lock
        let counters = lock_counters(&mut tx, new_file.user_id).await?;
        counters.ensure_can_consume(Resource::Uploads, 1)?;
        counters.ensure_can_consume(Resource::Storage, new_file.file_size)?;

        let file = sqlx::query_as!(
            File,
            r#"
            INSERT INTO files (id, user_id, module_id, file_name, file_type, file_size,
                               file_path, mime_type, content_hash, processing_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
            RETURNING id, user_id, module_id, file_name,
                      file_type as "file_type: FileType",
                      file_size, file_path, mime_type, content_hash,
                      processing_status as "processing_status: ProcessingStatus",
                      created_at, updated_at
            "#,
            new_file.id,
            new_file.user_id,
            new_file.module_id,
            new_file.file_name,
            new_file.file_type as FileType,
            new_file.file_size,
            new_file.file_path,
            new_file.mime_type,
            new_file.content_hash
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert file: {:?}", e);
            AppError::Database(e)
        })?;

        increment_usage(&mut *tx, new_file.user_id, Resource::Uploads, 1).await?;
        increment_usage(&mut *tx, new_file.user_id, Resource::Storage, new_file.file_size)
            .await?;

        tx.commit().await?;
        Ok(file)
    }

    async fn delete_owned(&self, file_id: Uuid, user_id: Uuid) -> Result<Option<File>> {
        sqlx::query_as!(
            File,
            r#"
            DELETE FROM files
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, module_id, file_name,
                      file_type as "file_type: FileType",
                      file_size, file_path, mime_type, content_hash,
                      processing_status as "processing_status: ProcessingStatus",
                      created_at, updated_at
            "#,
            file_id,
            user_id
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete file: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn transition_status(
        &self,
        file_id: Uuid,
        user_id: Uuid,
        to: ProcessingStatus,
    ) -> Result<bool> {
        guarded_transition(&self.pool, file_id, user_id, to)
            .await
            .map_err(|e| {
                tracing::error!("Failed to transition file {} to {:?}: {:?}", file_id, to, e);
                AppError::Database(e)
            })
    }
}
