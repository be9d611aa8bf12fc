use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::activity::ActivityRepository;
use crate::features::dashboard::dtos::DashboardResponseDto;
use crate::features::dashboard::models::study_streak;
use crate::features::dashboard::repositories::DashboardRepository;

const WEAK_TOPIC_LIMIT: i64 = 5;
const RECENT_ACTIVITY_LIMIT: i64 = 5;
/// Longest streak that can be reported
const STREAK_LOOKBACK_DAYS: i64 = 366;

pub struct DashboardService {
    repository: Arc<dyn DashboardRepository>,
    activity: Arc<dyn ActivityRepository>,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn DashboardRepository>,
        activity: Arc<dyn ActivityRepository>,
    ) -> Self {
        Self {
            repository,
            activity,
        }
    }

    /// Overview as of `today` (UTC). The activity list is best-effort.
    pub async fn summary(&self, user_id: Uuid, today: NaiveDate) -> Result<DashboardResponseDto> {
        let (counts, weakest, days) = tokio::try_join!(
            self.repository.counts(user_id),
            self.repository.weakest_sessions(user_id, WEAK_TOPIC_LIMIT),
            self.repository.study_days(user_id, STREAK_LOOKBACK_DAYS),
        )?;

        let recent_activity = match self.activity.recent(user_id, RECENT_ACTIVITY_LIMIT).await {
            Ok(entries) => entries.into_iter().map(Into::into).collect(),
            Err(e) => {
                tracing::warn!(user_id = %user_id, "Activity feed unavailable: {}", e);
                Vec::new()
            }
        };

        Ok(DashboardResponseDto {
            stats: counts.into(),
            streak_days: study_streak(&days, today),
            weak_topics: weakest.into_iter().map(Into::into).collect(),
            recent_activity,
        })
    }
}
