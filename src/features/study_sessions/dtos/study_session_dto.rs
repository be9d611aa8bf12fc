use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::study_sessions::models::{AnsweredItem, SessionType};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnsweredItemDto {
    /// Flashcard id or question id, depending on the session type
    pub item_id: Uuid,
    pub is_correct: bool,
}

impl From<&AnsweredItemDto> for AnsweredItem {
    fn from(dto: &AnsweredItemDto) -> Self {
        Self {
            item_id: dto.item_id,
            is_correct: dto.is_correct,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudySessionDto {
    pub module_id: Option<Uuid>,
    pub session_type: SessionType,
    #[validate(range(min = 0, message = "Duration must not be negative"))]
    pub duration_seconds: i32,
    #[serde(default)]
    #[validate(length(max = 500, message = "A session may contain at most 500 answers"))]
    pub items: Vec<AnsweredItemDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudySessionResponseDto {
    pub id: Uuid,
    pub module_id: Option<Uuid>,
    pub session_type: String,
    pub duration_seconds: i32,
    pub score: i16,
    pub correct_count: i32,
    pub incorrect_count: i32,
    /// Per-item rows that were saved; failures are logged and skipped
    pub progress_saved: usize,
    pub created_at: DateTime<Utc>,
}
