use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{
    SearchContentUseCase,
    search_content::{SearchContentError, SearchContentRequest},
};
use crate::presentation::http::dto::{ApiResponse, ErrorCode, SearchRequestDto, SearchResponseDto};

pub struct SearchHandler {
    search_use_case: Arc<SearchContentUseCase>,
}

impl SearchHandler {
    pub fn new(search_use_case: Arc<SearchContentUseCase>) -> Self {
        Self { search_use_case }
    }

    pub async fn search_content(
        State(handler): State<Arc<SearchHandler>>,
        Query(search_params): Query<SearchRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        if search_params.query.trim().is_empty() {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    ErrorCode::EmptyQuery,
                    "Query cannot be empty",
                    None,
                )),
            ));
        }

        let request = SearchContentRequest {
            query: search_params.query,
            top_k: search_params.top_k,
        };

        match handler.search_use_case.execute(request).await {
            Ok(response) => {
                let dto = SearchResponseDto::from(response);
                Ok((
                    StatusCode::OK,
                    Json(ApiResponse::<SearchResponseDto>::success(dto)),
                ))
            }
            Err(SearchContentError::ValidationError(message)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(ErrorCode::InvalidInput, message, None)),
            )),
            Err(SearchContentError::RetrievalError(e)) => {
                tracing::error!(error = %e, "Search failed");
                let status = if e.is_unavailable() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                Ok((
                    status,
                    Json(ApiResponse::error(ErrorCode::SearchFailed, e.to_string(), None)),
                ))
            }
        }
    }
}
