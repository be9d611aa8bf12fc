use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::generation::handlers::process_file;
use crate::features::generation::services::PipelineService;

pub fn routes(pipeline_service: Arc<PipelineService>) -> Router {
    Router::new()
        .route("/api/process-file", post(process_file))
        .with_state(pipeline_service)
}
