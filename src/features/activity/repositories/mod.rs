mod pg_activity_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::activity::models::{ActivityEntry, NewActivity};

pub use pg_activity_repository::PgActivityRepository;

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn append(&self, entry: NewActivity) -> Result<()>;

    /// Newest first
    async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<ActivityEntry>>;
}
