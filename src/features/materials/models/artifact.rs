use serde::Serialize;

use crate::shared::constants::MCQ_OPTION_COUNT;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    pub source_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McqQuestion {
    pub question: String,
    /// Always `MCQ_OPTION_COUNT` entries
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub explanation: String,
    pub source_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EssayPrompt {
    pub prompt: String,
    pub thesis_suggestion: String,
    pub key_arguments: Vec<String>,
    pub counter_arguments: Vec<String>,
    pub evidence_points: Vec<String>,
    pub source_reference: Option<String>,
}

/// Output of one generation, written all together or not at all
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeneratedArtifactBatch {
    pub flashcards: Vec<Flashcard>,
    pub mcq_questions: Vec<McqQuestion>,
    pub essay_prompts: Vec<EssayPrompt>,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl GeneratedArtifactBatch {
    /// Structural checks on a whole batch; the first violation rejects it.
    pub fn validate(&self) -> Result<(), String> {
        // Counts are requested in the prompt; only an empty collection is fatal
        if self.flashcards.is_empty() {
            return Err("Response contained no flashcards".to_string());
        }
        if self.mcq_questions.is_empty() {
            return Err("Response contained no multiple-choice questions".to_string());
        }
        if self.essay_prompts.is_empty() {
            return Err("Response contained no essay prompts".to_string());
        }

        for (i, card) in self.flashcards.iter().enumerate() {
            if blank(&card.question) || blank(&card.answer) {
                return Err(format!("Flashcard {} has an empty question or answer", i + 1));
            }
        }

        for (i, mcq) in self.mcq_questions.iter().enumerate() {
            if blank(&mcq.question) {
                return Err(format!("Question {} is empty", i + 1));
            }
            if mcq.options.len() != MCQ_OPTION_COUNT {
                return Err(format!(
                    "Question {} has {} options, expected {}",
                    i + 1,
                    mcq.options.len(),
                    MCQ_OPTION_COUNT
                ));
            }
            if mcq.options.iter().any(|o| blank(o)) {
                return Err(format!("Question {} has an empty option", i + 1));
            }
            if mcq.correct_option_index >= mcq.options.len() {
                return Err(format!(
                    "Question {} has correct option {} out of range",
                    i + 1,
                    mcq.correct_option_index
                ));
            }
        }

        for (i, essay) in self.essay_prompts.iter().enumerate() {
            if blank(&essay.prompt) {
                return Err(format!("Essay prompt {} is empty", i + 1));
            }
        }

        Ok(())
    }
}
