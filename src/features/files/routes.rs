use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{delete_file, get_file, list_files, upload_file};
use crate::features::files::services::FileService;
use crate::shared::constants::MAX_FILE_SIZE;

pub fn routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/files",
            // Room for the multipart envelope on top of the largest allowed file
            post(upload_file)
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024))
                .get(list_files),
        )
        .route("/api/files/{id}", get(get_file).delete(delete_file))
        .with_state(file_service)
}
