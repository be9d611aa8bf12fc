use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::SessionScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Flashcards,
    Questions,
}

impl SessionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Flashcards => "flashcards",
            SessionType::Questions => "questions",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Option<Uuid>,
    pub session_type: String,
    pub duration_seconds: i32,
    pub score: i16,
    pub correct_count: i32,
    pub incorrect_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStudySession {
    pub user_id: Uuid,
    pub module_id: Option<Uuid>,
    pub session_type: SessionType,
    pub duration_seconds: i32,
    pub score: SessionScore,
}

/// Per-item result; the item id lands in `card_id` or `question_id` by session type
#[derive(Debug, Clone)]
pub struct NewStudyProgress {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub is_correct: bool,
    pub session_type: SessionType,
}

impl NewStudyProgress {
    pub fn card_id(&self) -> Option<Uuid> {
        (self.session_type == SessionType::Flashcards).then_some(self.item_id)
    }

    pub fn question_id(&self) -> Option<Uuid> {
        (self.session_type == SessionType::Questions).then_some(self.item_id)
    }
}
