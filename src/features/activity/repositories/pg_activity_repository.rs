use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ActivityRepository;
use crate::core::error::{AppError, Result};
use crate::features::activity::models::{ActivityEntry, NewActivity};

pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn append(&self, entry: NewActivity) -> Result<()> {
        sqlx::query!(
            r#"
            INSERT INTO activity_feed (user_id, action, resource_type, resource_id, status, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
            entry.user_id,
            entry.action,
            entry.resource_type,
            entry.resource_id,
            entry.status,
            entry.metadata
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to append activity '{}': {:?}", entry.action, e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<ActivityEntry>> {
        sqlx::query_as!(
            ActivityEntry,
            r#"
            SELECT id, user_id, action, resource_type, resource_id, status, metadata, created_at
            FROM activity_feed
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
            user_id,
            limit
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch recent activity: {:?}", e);
            AppError::Database(e)
        })
    }
}
