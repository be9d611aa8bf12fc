use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::generation::dtos::{ProcessFileDto, ProcessFileResponseDto};
use crate::features::generation::services::PipelineService;
use crate::shared::types::ApiResponse;

/// Generate flashcards, questions and essay prompts from an uploaded file
///
/// Runs synchronously; the file's status moves to `processing` and ends as
/// `completed` or `failed`. A failed file may be submitted again.
#[utoipa::path(
    post,
    path = "/api/process-file",
    tag = "generation",
    request_body = ProcessFileDto,
    responses(
        (status = 200, description = "Materials generated", body = ApiResponse<ProcessFileResponseDto>),
        (status = 400, description = "Missing or malformed fileId"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "File not found"),
        (status = 409, description = "File is being processed or already processed"),
        (status = 429, description = "Monthly generation limit reached"),
        (status = 500, description = "Extraction, generation or persistence failed"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn process_file(
    user: AuthenticatedUser,
    State(service): State<Arc<PipelineService>>,
    AppJson(dto): AppJson<ProcessFileDto>,
) -> Result<Json<ApiResponse<ProcessFileResponseDto>>> {
    let counts = service.process_file(dto.file_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}
