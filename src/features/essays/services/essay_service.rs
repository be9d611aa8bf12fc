use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityRepository, NewActivity};
use crate::features::essays::dtos::{EssayFeedbackResponseDto, SubmitEssayDto};
use crate::features::essays::models::EssayFeedback;
use crate::features::materials::repositories::ArtifactRepository;
use crate::modules::llm::TextCompletion;
use crate::shared::constants::{ACTION_SUBMIT_ESSAY, MIN_ESSAY_LENGTH};
use crate::shared::llm::parse_llm_json;
use crate::shared::prompts::{render_essay_feedback_prompt, EssayFeedbackPromptContext};

pub struct EssayService {
    artifacts: Arc<dyn ArtifactRepository>,
    activity: Arc<dyn ActivityRepository>,
    llm: Arc<dyn TextCompletion>,
    max_tokens: u32,
    timeout: Duration,
}

impl EssayService {
    pub fn new(
        artifacts: Arc<dyn ArtifactRepository>,
        activity: Arc<dyn ActivityRepository>,
        llm: Arc<dyn TextCompletion>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            artifacts,
            activity,
            llm,
            max_tokens,
            timeout,
        }
    }

    /// Grade an essay against one of the caller's generated prompts.
    pub async fn submit(
        &self,
        user_id: Uuid,
        dto: SubmitEssayDto,
    ) -> Result<EssayFeedbackResponseDto> {
        let essay = dto.essay_text.trim();
        if essay.chars().count() < MIN_ESSAY_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Essay must be at least {} characters",
                MIN_ESSAY_LENGTH
            )));
        }

        let prompt = self
            .artifacts
            .find_essay_prompt(dto.prompt_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Essay prompt not found".to_string()))?;

        let framework = &prompt.argument_framework.0;
        let thesis = framework.thesis_suggestion.trim();
        let rendered = render_essay_feedback_prompt(&EssayFeedbackPromptContext {
            prompt: &prompt.prompt,
            thesis_suggestion: (!thesis.is_empty()).then_some(thesis),
            key_arguments: &framework.key_arguments,
            counter_arguments: &framework.counter_arguments,
            evidence_points: &framework.evidence_points,
            essay,
        })
        .map_err(|e| AppError::Internal(format!("Failed to render essay prompt: {}", e)))?;

        let raw = tokio::time::timeout(
            self.timeout,
            self.llm.complete(&rendered.system, &rendered.user, self.max_tokens),
        )
        .await
        .map_err(|_| AppError::GenerationService {
            status: 504,
            body: format!(
                "Essay feedback timed out after {}s",
                self.timeout.as_secs_f64()
            ),
        })??;

        let feedback: EssayFeedback = parse_llm_json(&raw).map_err(AppError::GenerationFormat)?;

        let entry = NewActivity::new(user_id, ACTION_SUBMIT_ESSAY)
            .resource("essay_prompt", prompt.id)
            .status("completed")
            .metadata(json!({
                "grade_estimate": feedback.grade_estimate.as_str(),
                "essay_length": essay.chars().count(),
            }));
        if let Err(e) = self.activity.append(entry).await {
            error!(prompt_id = %prompt.id, "Failed to log essay activity: {}", e);
        }

        info!(
            prompt_id = %prompt.id,
            user_id = %user_id,
            grade = feedback.grade_estimate.as_str(),
            "Essay feedback generated"
        );

        Ok(EssayFeedbackResponseDto {
            prompt_id: prompt.id,
            feedback,
        })
    }
}
