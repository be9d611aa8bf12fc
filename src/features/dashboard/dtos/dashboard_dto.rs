use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::activity::ActivityEntry;
use crate::features::dashboard::models::{DashboardCounts, WeakSession};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    pub total_modules: i64,
    pub total_flashcards: i64,
    pub study_sessions: i64,
    /// Whole percent, 0 when there are no sessions
    #[schema(example = 72)]
    pub average_score: i32,
}

impl From<DashboardCounts> for DashboardStatsDto {
    fn from(counts: DashboardCounts) -> Self {
        Self {
            total_modules: counts.module_count,
            total_flashcards: counts.flashcard_count,
            study_sessions: counts.session_count,
            average_score: counts.average_score.unwrap_or(0),
        }
    }
}

/// A low-scoring session and the module it covered
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeakTopicDto {
    pub session_id: Uuid,
    pub module_id: Uuid,
    pub score: i16,
    pub studied_at: DateTime<Utc>,
}

impl From<WeakSession> for WeakTopicDto {
    fn from(session: WeakSession) -> Self {
        Self {
            session_id: session.id,
            module_id: session.module_id,
            score: session.score,
            studied_at: session.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityEntryDto {
    pub id: Uuid,
    #[schema(example = "generate_materials")]
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<Uuid>,
    pub status: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityEntry> for ActivityEntryDto {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            id: entry.id,
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            status: entry.status,
            metadata: entry.metadata,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponseDto {
    pub stats: DashboardStatsDto,
    /// Consecutive days with a study session, ending today or yesterday
    pub streak_days: u32,
    pub weak_topics: Vec<WeakTopicDto>,
    pub recent_activity: Vec<ActivityEntryDto>,
}
