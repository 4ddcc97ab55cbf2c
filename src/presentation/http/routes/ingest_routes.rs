use axum::{Router, extract::DefaultBodyLimit, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::IngestHandler;

/// `max_upload_bytes` replaces axum's default multipart limit; the server's
/// `RequestBodyLimitLayer` enforces the same cap.
pub fn ingest_routes(ingest_handler: Arc<IngestHandler>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/ingest", post(IngestHandler::ingest_documents))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(ingest_handler)
}
