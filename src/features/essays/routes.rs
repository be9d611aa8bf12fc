use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::essays::handlers::submit_essay;
use crate::features::essays::services::EssayService;

pub fn routes(essay_service: Arc<EssayService>) -> Router {
    Router::new()
        .route("/api/essay-feedback", post(submit_essay))
        .with_state(essay_service)
}
