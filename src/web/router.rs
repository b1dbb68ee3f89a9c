//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_document, download_document, get_document, list_documents, upload_document, AppState,
};
use super::middleware::create_cors_layer;

/// Room left in the request body limit for multipart boundaries and part headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main router: the JSON API under `/api` plus the public blob prefix.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit = usize::try_from(app_state.max_upload_size())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let api_routes = Router::new()
        .route(
            "/upload",
            post(upload_document).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/documents", get(list_documents))
        .route("/documents/:id", get(get_document).delete(delete_document))
        .route("/documents/:id/download", get(download_document));

    let storage = app_state.documents.storage();
    let blobs = ServeDir::new(storage.base_path());

    Router::new()
        .nest("/api", api_routes)
        .nest_service(storage.public_prefix(), blobs)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
