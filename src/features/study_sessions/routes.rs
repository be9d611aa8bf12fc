use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::study_sessions::handlers::create_study_session;
use crate::features::study_sessions::services::StudySessionService;

pub fn routes(study_session_service: Arc<StudySessionService>) -> Router {
    Router::new()
        .route("/api/study-sessions", post(create_study_session))
        .with_state(study_session_service)
}
