use async_trait::async_trait;
use sqlx::PgPool;

use super::StudySessionRepository;
use crate::core::error::{AppError, Result};
use crate::features::study_sessions::models::{NewStudyProgress, NewStudySession, StudySession};

pub struct PgStudySessionRepository {
    pool: PgPool,
}

impl PgStudySessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudySessionRepository for PgStudySessionRepository {
    async fn create_session(&self, session: NewStudySession) -> Result<StudySession> {
        sqlx::query_as!(
            StudySession,
            r#"
            INSERT INTO study_sessions (user_id, module_id, session_type, duration_seconds,
                                        score, correct_count, incorrect_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, module_id, session_type, duration_seconds,
                      score, correct_count, incorrect_count, created_at
            "#,
            session.user_id,
            session.module_id,
            session.session_type.as_str(),
            session.duration_seconds,
            session.score.score,
            session.score.correct_count,
            session.score.incorrect_count
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create study session: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert_progress(&self, progress: NewStudyProgress) -> Result<()> {
        sqlx::query!(
            r#"
            INSERT INTO study_progress (session_id, user_id, card_id, question_id,
                                        is_correct, session_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
            progress.session_id,
            progress.user_id,
            progress.card_id(),
            progress.question_id(),
            progress.is_correct,
            progress.session_type.as_str()
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
