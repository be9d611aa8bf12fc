use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::files::models::ProcessingStatus;
use crate::features::materials::models::{
    EssayPromptRecord, FlashcardRecord, McqQuestionRecord,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FlashcardDto {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub source_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FlashcardRecord> for FlashcardDto {
    fn from(record: FlashcardRecord) -> Self {
        Self {
            id: record.id,
            question: record.question,
            answer: record.answer,
            source_reference: record.source_reference,
            created_at: record.created_at,
        }
    }
}

/// Multiple-choice question with its options decoded from storage
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct McqQuestionDto {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_index: i32,
    pub explanation: String,
    pub source_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<McqQuestionRecord> for McqQuestionDto {
    fn from(record: McqQuestionRecord) -> Self {
        let options = record.options.0;
        Self {
            id: record.id,
            question: record.question,
            options: options.choices,
            correct_option_index: options.correct_index,
            explanation: options.explanation,
            source_reference: record.source_reference,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EssayPromptDto {
    pub id: Uuid,
    pub prompt: String,
    pub thesis_suggestion: String,
    pub key_arguments: Vec<String>,
    pub counter_arguments: Vec<String>,
    pub evidence_points: Vec<String>,
    pub source_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<EssayPromptRecord> for EssayPromptDto {
    fn from(record: EssayPromptRecord) -> Self {
        let framework = record.argument_framework.0;
        Self {
            id: record.id,
            prompt: record.prompt,
            thesis_suggestion: framework.thesis_suggestion,
            key_arguments: framework.key_arguments,
            counter_arguments: framework.counter_arguments,
            evidence_points: framework.evidence_points,
            source_reference: record.source_reference,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MaterialsResponseDto {
    pub file_id: Uuid,
    pub processing_status: ProcessingStatus,
    pub flashcards: Vec<FlashcardDto>,
    pub mcq_questions: Vec<McqQuestionDto>,
    pub essay_prompts: Vec<EssayPromptDto>,
}
