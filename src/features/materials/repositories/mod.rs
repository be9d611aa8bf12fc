mod pg_artifact_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::File;
use crate::features::materials::models::{
    EssayPromptRecord, GeneratedArtifactBatch, StoredMaterials,
};

pub use pg_artifact_repository::PgArtifactRepository;

#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Persist a generation as one unit: the three artifact batches, the
    /// `processing -> completed` transition and the generation charge.
    ///
    /// Nothing is written unless all of it is.
    async fn commit_generation(&self, file: &File, batch: &GeneratedArtifactBatch) -> Result<()>;

    async fn list_for_file(&self, file_id: Uuid, user_id: Uuid) -> Result<StoredMaterials>;

    async fn find_essay_prompt(
        &self,
        prompt_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EssayPromptRecord>>;
}
