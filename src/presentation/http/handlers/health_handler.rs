use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::domain::repositories::VectorStore;
use crate::presentation::http::dto::{ApiResponse, HealthResponseDto};

pub struct HealthHandler {
    vector_store: Arc<dyn VectorStore>,
}

impl HealthHandler {
    pub fn new(vector_store: Arc<dyn VectorStore>) -> Self {
        Self { vector_store }
    }

    pub async fn root() -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(ApiResponse::success("pdfrag".to_string())),
        )
    }

    pub async fn health(State(handler): State<Arc<HealthHandler>>) -> impl IntoResponse {
        let reachable = match handler.vector_store.health_check().await {
            Ok(reachable) => reachable,
            Err(e) => {
                tracing::warn!(error = %e, "Vector store health check failed");
                false
            }
        };

        let (status, health_status, vector_store) = if reachable {
            (StatusCode::OK, "healthy", "reachable")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        };

        let health_response = HealthResponseDto {
            status: health_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            vector_store: vector_store.to_string(),
        };

        (status, Json(ApiResponse::success(health_response)))
    }
}
