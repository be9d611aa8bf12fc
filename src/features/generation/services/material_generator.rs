use serde::Deserialize;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::materials::models::{
    EssayPrompt, Flashcard, GeneratedArtifactBatch, McqQuestion,
};
use crate::modules::llm::TextCompletion;
use crate::shared::llm::parse_llm_json_strict;
use crate::shared::prompts::render_study_materials_prompt;

// Wire shape requested by the study-materials prompt. Every field is
// required except `source_reference`.

#[derive(Debug, Deserialize)]
struct RawFlashcard {
    question: String,
    answer: String,
    source_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMcqQuestion {
    question: String,
    options: Vec<String>,
    correct_option: usize,
    explanation: String,
    source_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEssayPrompt {
    prompt: String,
    thesis_suggestion: String,
    key_arguments: Vec<String>,
    counter_arguments: Vec<String>,
    evidence_points: Vec<String>,
    source_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMaterials {
    flashcards: Vec<RawFlashcard>,
    mcq_questions: Vec<RawMcqQuestion>,
    essay_prompts: Vec<RawEssayPrompt>,
}

impl From<RawMaterials> for GeneratedArtifactBatch {
    fn from(raw: RawMaterials) -> Self {
        Self {
            flashcards: raw
                .flashcards
                .into_iter()
                .map(|c| Flashcard {
                    question: c.question,
                    answer: c.answer,
                    source_reference: c.source_reference,
                })
                .collect(),
            mcq_questions: raw
                .mcq_questions
                .into_iter()
                .map(|q| McqQuestion {
                    question: q.question,
                    options: q.options,
                    correct_option_index: q.correct_option,
                    explanation: q.explanation,
                    source_reference: q.source_reference,
                })
                .collect(),
            essay_prompts: raw
                .essay_prompts
                .into_iter()
                .map(|e| EssayPrompt {
                    prompt: e.prompt,
                    thesis_suggestion: e.thesis_suggestion,
                    key_arguments: e.key_arguments,
                    counter_arguments: e.counter_arguments,
                    evidence_points: e.evidence_points,
                    source_reference: e.source_reference,
                })
                .collect(),
        }
    }
}

/// Turns extracted text into a validated artifact batch with one model call.
///
/// No retries here; a failure ends the run.
pub struct MaterialGenerator {
    llm: Arc<dyn TextCompletion>,
    max_tokens: u32,
}

impl MaterialGenerator {
    pub fn new(llm: Arc<dyn TextCompletion>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    pub async fn generate(&self, content: &str) -> Result<GeneratedArtifactBatch> {
        let prompt = render_study_materials_prompt(content)
            .map_err(|e| AppError::Internal(format!("Failed to render prompt: {}", e)))?;

        let text = self
            .llm
            .complete(&prompt.system, &prompt.user, self.max_tokens)
            .await?;

        let raw: RawMaterials = parse_llm_json_strict(&text).map_err(|e| {
            tracing::warn!("Unusable study materials response: {}", e);
            AppError::GenerationFormat(e)
        })?;

        let batch = GeneratedArtifactBatch::from(raw);
        batch.validate().map_err(|e| {
            tracing::warn!("Study materials failed validation: {}", e);
            AppError::GenerationFormat(e)
        })?;

        Ok(batch)
    }
}
