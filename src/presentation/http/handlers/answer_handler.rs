use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::{
    AnswerQuestionUseCase,
    answer_question::{AnswerQuestionError, AnswerQuestionRequest},
};
use crate::presentation::http::dto::{AnswerRequestDto, AnswerResponseDto, ApiResponse, ErrorCode};

pub struct AnswerHandler {
    answer_use_case: Arc<AnswerQuestionUseCase>,
}

impl AnswerHandler {
    pub fn new(answer_use_case: Arc<AnswerQuestionUseCase>) -> Self {
        Self { answer_use_case }
    }

    pub async fn answer_question(
        State(handler): State<Arc<AnswerHandler>>,
        Json(payload): Json<AnswerRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = AnswerQuestionRequest {
            question: payload.question,
            top_k: payload.top_k,
        };

        match handler.answer_use_case.execute(request).await {
            Ok(answer) => {
                let dto = AnswerResponseDto::from(answer);
                Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
            }
            Err(e) => {
                let (status, code) = match &e {
                    AnswerQuestionError::ValidationError(_) => {
                        (StatusCode::BAD_REQUEST, ErrorCode::InvalidInput)
                    }
                    AnswerQuestionError::RetrievalError(inner) if inner.is_unavailable() => {
                        (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable)
                    }
                    AnswerQuestionError::RetrievalError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::RetrievalFailed)
                    }
                    AnswerQuestionError::SynthesisError(_) => {
                        (StatusCode::BAD_GATEWAY, ErrorCode::GenerationFailed)
                    }
                };
                if status.is_server_error() {
                    tracing::error!(error = %e, "Answering question failed");
                }

                Ok((
                    status,
                    Json(ApiResponse::<AnswerResponseDto>::error(code, e.to_string(), None)),
                ))
            }
        }
    }
}
