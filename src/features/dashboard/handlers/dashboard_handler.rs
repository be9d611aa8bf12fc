use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::dtos::DashboardResponseDto;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Get the caller's study overview
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard overview", body = ApiResponse<DashboardResponseDto>),
        (status = 401, description = "Authentication required"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_dashboard(
    user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardResponseDto>>> {
    let summary = service
        .summary(user.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}
