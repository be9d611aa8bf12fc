use futures::stream::{self, StreamExt};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::activity::{ActivityRepository, NewActivity};
use crate::features::study_sessions::dtos::{CreateStudySessionDto, StudySessionResponseDto};
use crate::features::study_sessions::models::{
    finalize_session, AnsweredItem, NewStudyProgress, NewStudySession,
};
use crate::features::study_sessions::repositories::StudySessionRepository;
use crate::shared::constants::ACTION_STUDY_SESSION;

/// Progress rows written at once; sessions can carry hundreds of items
const PROGRESS_INSERT_CONCURRENCY: usize = 8;

pub struct StudySessionService {
    repository: Arc<dyn StudySessionRepository>,
    activity: Arc<dyn ActivityRepository>,
}

impl StudySessionService {
    pub fn new(
        repository: Arc<dyn StudySessionRepository>,
        activity: Arc<dyn ActivityRepository>,
    ) -> Self {
        Self {
            repository,
            activity,
        }
    }

    /// Score and store a finished session.
    ///
    /// The session row must be written; per-item rows are best-effort.
    pub async fn record(
        &self,
        user_id: Uuid,
        dto: CreateStudySessionDto,
    ) -> Result<StudySessionResponseDto> {
        let items: Vec<AnsweredItem> = dto.items.iter().map(AnsweredItem::from).collect();
        let score = finalize_session(&items);

        let session = self
            .repository
            .create_session(NewStudySession {
                user_id,
                module_id: dto.module_id,
                session_type: dto.session_type,
                duration_seconds: dto.duration_seconds,
                score,
            })
            .await?;

        let results: Vec<_> = stream::iter(items.iter().copied())
            .map(|item| async move {
                let result = self
                    .repository
                    .insert_progress(NewStudyProgress {
                        session_id: session.id,
                        user_id,
                        item_id: item.item_id,
                        is_correct: item.is_correct,
                        session_type: dto.session_type,
                    })
                    .await;
                (item.item_id, result)
            })
            .buffer_unordered(PROGRESS_INSERT_CONCURRENCY)
            .collect()
            .await;

        let mut progress_saved = 0;
        for (item_id, result) in results {
            match result {
                Ok(()) => progress_saved += 1,
                Err(e) => tracing::warn!(
                    session_id = %session.id,
                    item_id = %item_id,
                    "Failed to save study progress: {}",
                    e
                ),
            }
        }

        let entry = NewActivity::new(user_id, ACTION_STUDY_SESSION)
            .resource("study_session", session.id)
            .status("completed")
            .metadata(json!({
                "session_type": dto.session_type.as_str(),
                "score": score.score,
            }));
        if let Err(e) = self.activity.append(entry).await {
            tracing::error!(session_id = %session.id, "Failed to log study session activity: {}", e);
        }

        tracing::info!(
            session_id = %session.id,
            user_id = %user_id,
            score = session.score,
            "Study session recorded"
        );

        Ok(StudySessionResponseDto {
            id: session.id,
            module_id: session.module_id,
            session_type: session.session_type,
            duration_seconds: session.duration_seconds,
            score: session.score,
            correct_count: session.correct_count,
            incorrect_count: session.incorrect_count,
            progress_saved,
            created_at: session.created_at,
        })
    }
}
