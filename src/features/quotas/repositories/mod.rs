mod pg_quota_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::quotas::models::{QuotaCounters, Resource};

pub use pg_quota_repository::{increment_usage, lock_counters, PgQuotaRepository};

#[async_trait]
pub trait QuotaRepository: Send + Sync {
    /// Current counters, creating a free-tier profile on first access
    async fn get_or_create(&self, user_id: Uuid) -> Result<QuotaCounters>;

    /// Atomically add `amount` to the resource counter
    async fn increment(&self, user_id: Uuid, resource: Resource, amount: i64) -> Result<()>;
}
