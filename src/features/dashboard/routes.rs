use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers::get_dashboard;
use crate::features::dashboard::services::DashboardService;

pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .with_state(dashboard_service)
}
