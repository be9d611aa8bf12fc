use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessFileDto {
    #[serde(rename = "fileId", alias = "file_id")]
    pub file_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessFileResponseDto {
    pub flashcards_count: usize,
    pub mcq_count: usize,
    pub essays_count: usize,
}
