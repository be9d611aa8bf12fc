mod pg_file_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::{File, NewFile, ProcessingStatus};

pub use pg_file_repository::{guarded_transition, PgFileRepository};

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Lookup filtered on both id and owner; another user's file reads as absent
    async fn find_owned(&self, file_id: Uuid, user_id: Uuid) -> Result<Option<File>>;

    /// Newest first
    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<File>>;

    /// Insert the row in `pending` and charge one upload plus its bytes, atomically
    async fn create(&self, new_file: NewFile) -> Result<File>;

    async fn delete_owned(&self, file_id: Uuid, user_id: Uuid) -> Result<Option<File>>;

    /// Compare-and-swap status update guarded by the transition table.
    ///
    /// Returns `false` when no row in an allowed source state matched.
    async fn transition_status(
        &self,
        file_id: Uuid,
        user_id: Uuid,
        to: ProcessingStatus,
    ) -> Result<bool>;
}
