use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Aggregates over everything the user owns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardCounts {
    /// Distinct modules that have at least one uploaded file
    pub module_count: i64,
    pub flashcard_count: i64,
    pub session_count: i64,
    /// Mean session score rounded to a whole percent; `None` without sessions
    pub average_score: Option<i32>,
}

/// A scored session tied to a module, used to surface weak topics
#[derive(Debug, Clone, PartialEq)]
pub struct WeakSession {
    pub id: Uuid,
    pub module_id: Uuid,
    pub score: i16,
    pub created_at: DateTime<Utc>,
}

/// Consecutive days with at least one session, ending today or yesterday.
///
/// `days` must be distinct and newest first. A streak whose latest day is
/// before yesterday has lapsed and counts as zero.
pub fn study_streak(days: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut past = days.iter().copied().filter(|day| *day <= today);

    let Some(latest) = past.next() else {
        return 0;
    };
    if (today - latest).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut expected = latest.pred_opt();
    for day in past {
        if Some(day) != expected {
            break;
        }
        streak += 1;
        expected = day.pred_opt();
    }
    streak
}
