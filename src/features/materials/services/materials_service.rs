use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::repositories::FileRepository;
use crate::features::materials::dtos::MaterialsResponseDto;
use crate::features::materials::repositories::ArtifactRepository;

/// Read side of the generated study materials
pub struct MaterialsService {
    files: Arc<dyn FileRepository>,
    artifacts: Arc<dyn ArtifactRepository>,
}

impl MaterialsService {
    pub fn new(files: Arc<dyn FileRepository>, artifacts: Arc<dyn ArtifactRepository>) -> Self {
        Self { files, artifacts }
    }

    pub async fn for_file(&self, file_id: Uuid, user_id: Uuid) -> Result<MaterialsResponseDto> {
        let file = self
            .files
            .find_owned(file_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let stored = self.artifacts.list_for_file(file.id, user_id).await?;

        Ok(MaterialsResponseDto {
            file_id: file.id,
            processing_status: file.processing_status,
            flashcards: stored.flashcards.into_iter().map(Into::into).collect(),
            mcq_questions: stored.mcq_questions.into_iter().map(Into::into).collect(),
            essay_prompts: stored.essay_prompts.into_iter().map(Into::into).collect(),
        })
    }
}
