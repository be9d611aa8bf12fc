use axum::{extract::State, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppPath;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::materials::dtos::MaterialsResponseDto;
use crate::features::materials::services::MaterialsService;
use crate::shared::types::ApiResponse;

/// Get the study materials generated from a file
#[utoipa::path(
    get,
    path = "/api/files/{id}/materials",
    tag = "materials",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Generated materials", body = ApiResponse<MaterialsResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "File not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_file_materials(
    user: AuthenticatedUser,
    State(service): State<Arc<MaterialsService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<MaterialsResponseDto>>> {
    let materials = service.for_file(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(materials), None, None)))
}
