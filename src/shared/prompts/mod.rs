//! Prompt rendering for the generative-model calls.
//!
//! # Usage
//!
//! ```ignore
//! use crate::shared::prompts::render_study_materials_prompt;
//!
//! let prompt = render_study_materials_prompt(&extracted_text)?;
//! let text = llm.complete(&prompt.system, &prompt.user, 4000).await?;
//! ```

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::context;

use crate::shared::constants::{ESSAY_PROMPT_COUNT, FLASHCARD_COUNT, MCQ_COUNT, MCQ_OPTION_COUNT};

/// A rendered system/user prompt pair
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Render the study-material generation prompt around the extracted text.
pub fn render_study_materials_prompt(content: &str) -> Result<RenderedPrompt, TemplateError> {
    let system = render_template("study_materials/system.jinja", context! {})?;
    let user = render_template(
        "study_materials/user.jinja",
        context! {
            flashcard_count => FLASHCARD_COUNT,
            mcq_count => MCQ_COUNT,
            option_count => MCQ_OPTION_COUNT,
            essay_count => ESSAY_PROMPT_COUNT,
            content => content,
        },
    )?;

    Ok(RenderedPrompt { system, user })
}

/// Context for the essay-feedback prompt; framework lists may be empty.
pub struct EssayFeedbackPromptContext<'a> {
    pub prompt: &'a str,
    pub thesis_suggestion: Option<&'a str>,
    pub key_arguments: &'a [String],
    pub counter_arguments: &'a [String],
    pub evidence_points: &'a [String],
    pub essay: &'a str,
}

pub fn render_essay_feedback_prompt(
    ctx: &EssayFeedbackPromptContext<'_>,
) -> Result<RenderedPrompt, TemplateError> {
    let system = render_template("essay_feedback/system.jinja", context! {})?;
    let user = render_template(
        "essay_feedback/user.jinja",
        context! {
            prompt => ctx.prompt,
            thesis_suggestion => ctx.thesis_suggestion,
            key_arguments => ctx.key_arguments,
            counter_arguments => ctx.counter_arguments,
            evidence_points => ctx.evidence_points,
            essay => ctx.essay,
        },
    )?;

    Ok(RenderedPrompt { system, user })
}
