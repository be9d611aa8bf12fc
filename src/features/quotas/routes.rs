use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::quotas::handlers::get_usage;
use crate::features::quotas::services::QuotaService;

pub fn routes(quota_service: Arc<QuotaService>) -> Router {
    Router::new()
        .route("/api/usage", get(get_usage))
        .with_state(quota_service)
}
