use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::quotas::dtos::UsageResponseDto;
use crate::features::quotas::services::QuotaService;
use crate::shared::types::ApiResponse;

/// Get the caller's quota usage for the current month
#[utoipa::path(
    get,
    path = "/api/usage",
    tag = "usage",
    responses(
        (status = 200, description = "Quota snapshot", body = ApiResponse<UsageResponseDto>),
        (status = 401, description = "Authentication required"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_usage(
    user: AuthenticatedUser,
    State(service): State<Arc<QuotaService>>,
) -> Result<Json<ApiResponse<UsageResponseDto>>> {
    let usage = service.usage(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(usage), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::quotas::routes;
    use crate::shared::test_helpers::{with_user, InMemoryStore};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_get_usage_returns_snapshot() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        store.set_counters(user_id, "pro", 3, 7, 0);
        let service = Arc::new(QuotaService::new(store.clone()));
        let server = TestServer::new(with_user(routes::routes(service), user_id)).unwrap();

        let response = server.get("/api/usage").await;

        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["tier"], "pro");
        assert_eq!(body["data"]["remaining"]["generations"], 93);
        assert_eq!(body["data"]["limits"]["uploads"], 30);
    }
}
