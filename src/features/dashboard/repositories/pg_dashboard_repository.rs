use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::DashboardRepository;
use crate::core::error::{AppError, Result};
use crate::features::dashboard::models::{DashboardCounts, WeakSession};

pub struct PgDashboardRepository {
    pool: PgPool,
}

impl PgDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardRepository for PgDashboardRepository {
    async fn counts(&self, user_id: Uuid) -> Result<DashboardCounts> {
        sqlx::query_as!(
            DashboardCounts,
            r#"
            SELECT
                (SELECT COUNT(DISTINCT module_id) FROM files WHERE user_id = $1) as "module_count!",
                (SELECT COUNT(*) FROM flashcards WHERE user_id = $1) as "flashcard_count!",
                (SELECT COUNT(*) FROM study_sessions WHERE user_id = $1) as "session_count!",
                (SELECT ROUND(AVG(score))::INT4 FROM study_sessions WHERE user_id = $1)
                    as "average_score?"
            "#,
            user_id
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute dashboard counts: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn weakest_sessions(&self, user_id: Uuid, limit: i64) -> Result<Vec<WeakSession>> {
        sqlx::query_as!(
            WeakSession,
            r#"
            SELECT id, module_id as "module_id!", score, created_at
            FROM study_sessions
            WHERE user_id = $1 AND module_id IS NOT NULL
            ORDER BY score ASC, created_at DESC
            LIMIT $2
            "#,
            user_id,
            limit
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch weakest sessions: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn study_days(&self, user_id: Uuid, limit: i64) -> Result<Vec<NaiveDate>> {
        sqlx::query_scalar!(
            r#"
            SELECT DISTINCT (created_at AT TIME ZONE 'UTC')::DATE as "day!"
            FROM study_sessions
            WHERE user_id = $1
            ORDER BY 1 DESC
            LIMIT $2
            "#,
            user_id,
            limit
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch study days: {:?}", e);
            AppError::Database(e)
        })
    }
}
