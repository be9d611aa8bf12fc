use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::materials::handlers::get_file_materials;
use crate::features::materials::services::MaterialsService;

pub fn routes(materials_service: Arc<MaterialsService>) -> Router {
    Router::new()
        .route("/api/files/{id}/materials", get(get_file_materials))
        .with_state(materials_service)
}
