mod pg_study_session_repository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::study_sessions::models::{NewStudyProgress, NewStudySession, StudySession};

pub use pg_study_session_repository::PgStudySessionRepository;

#[async_trait]
pub trait StudySessionRepository: Send + Sync {
    async fn create_session(&self, session: NewStudySession) -> Result<StudySession>;

    async fn insert_progress(&self, progress: NewStudyProgress) -> Result<()>;
}
