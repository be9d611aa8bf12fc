use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{EssayPrompt, McqQuestion};

/// Stored shape of `mcq_questions.options`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct McqOptions {
    pub choices: Vec<String>,
    pub correct_index: i32,
    pub explanation: String,
}

impl From<&McqQuestion> for McqOptions {
    fn from(mcq: &McqQuestion) -> Self {
        Self {
            choices: mcq.options.clone(),
            correct_index: mcq.correct_option_index as i32,
            explanation: mcq.explanation.clone(),
        }
    }
}

/// Stored shape of `essay_prompts.argument_framework`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArgumentFramework {
    pub thesis_suggestion: String,
    #[serde(default)]
    pub key_arguments: Vec<String>,
    #[serde(default)]
    pub counter_arguments: Vec<String>,
    #[serde(default)]
    pub evidence_points: Vec<String>,
}

impl From<&EssayPrompt> for ArgumentFramework {
    fn from(essay: &EssayPrompt) -> Self {
        Self {
            thesis_suggestion: essay.thesis_suggestion.clone(),
            key_arguments: essay.key_arguments.clone(),
            counter_arguments: essay.counter_arguments.clone(),
            evidence_points: essay.evidence_points.clone(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct FlashcardRecord {
    pub id: Uuid,
    pub file_id: Uuid,
    pub module_id: Uuid,
    pub user_id: Uuid,
    pub question: String,
    pub answer: String,
    pub source_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct McqQuestionRecord {
    pub id: Uuid,
    pub file_id: Uuid,
    pub module_id: Uuid,
    pub user_id: Uuid,
    pub question: String,
    pub options: Json<McqOptions>,
    pub source_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EssayPromptRecord {
    pub id: Uuid,
    pub file_id: Uuid,
    pub module_id: Uuid,
    pub user_id: Uuid,
    pub prompt: String,
    pub argument_framework: Json<ArgumentFramework>,
    pub source_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything persisted for one file
#[derive(Debug, Clone, Default)]
pub struct StoredMaterials {
    pub flashcards: Vec<FlashcardRecord>,
    pub mcq_questions: Vec<McqQuestionRecord>,
    pub essay_prompts: Vec<EssayPromptRecord>,
}
