mod pg_dashboard_repository;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::dashboard::models::{DashboardCounts, WeakSession};

pub use pg_dashboard_repository::PgDashboardRepository;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn counts(&self, user_id: Uuid) -> Result<DashboardCounts>;

    /// Lowest score first; sessions without a module are skipped
    async fn weakest_sessions(&self, user_id: Uuid, limit: i64) -> Result<Vec<WeakSession>>;

    /// Distinct UTC days with a session, newest first
    async fn study_days(&self, user_id: Uuid, limit: i64) -> Result<Vec<NaiveDate>>;
}
