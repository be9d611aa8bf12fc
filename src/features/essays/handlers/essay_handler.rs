use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::essays::dtos::{EssayFeedbackResponseDto, SubmitEssayDto};
use crate::features::essays::services::EssayService;
use crate::shared::types::ApiResponse;

/// Get structured feedback and a grade estimate for an essay
#[utoipa::path(
    post,
    path = "/api/essay-feedback",
    tag = "essays",
    request_body = SubmitEssayDto,
    responses(
        (status = 200, description = "Feedback generated", body = ApiResponse<EssayFeedbackResponseDto>),
        (status = 400, description = "Essay too short or request malformed"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Essay prompt not found"),
        (status = 500, description = "Feedback generation failed"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit_essay(
    user: AuthenticatedUser,
    State(service): State<Arc<EssayService>>,
    AppJson(dto): AppJson<SubmitEssayDto>,
) -> Result<Json<ApiResponse<EssayFeedbackResponseDto>>> {
    let feedback = service.submit(user.user_id, dto).await?;
    Ok(Json(ApiResponse::success(Some(feedback), None, None)))
}
