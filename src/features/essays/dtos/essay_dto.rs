use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::essays::models::EssayFeedback;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitEssayDto {
    #[serde(rename = "essayText", alias = "essay_text")]
    pub essay_text: String,
    #[serde(rename = "promptId", alias = "prompt_id")]
    pub prompt_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EssayFeedbackResponseDto {
    pub prompt_id: Uuid,
    pub feedback: EssayFeedback,
}
