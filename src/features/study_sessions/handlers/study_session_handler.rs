use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::study_sessions::dtos::{CreateStudySessionDto, StudySessionResponseDto};
use crate::features::study_sessions::services::StudySessionService;
use crate::shared::types::ApiResponse;

/// Finalize and store a flashcard or quiz session
#[utoipa::path(
    post,
    path = "/api/study-sessions",
    tag = "study-sessions",
    request_body = CreateStudySessionDto,
    responses(
        (status = 201, description = "Session recorded", body = ApiResponse<StudySessionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_study_session(
    user: AuthenticatedUser,
    State(service): State<Arc<StudySessionService>>,
    AppJson(dto): AppJson<CreateStudySessionDto>,
) -> Result<(StatusCode, Json<ApiResponse<StudySessionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = service.record(user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(session), None, None)),
    ))
}
