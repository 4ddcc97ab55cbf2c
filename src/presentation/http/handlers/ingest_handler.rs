use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{
    IngestDocumentsUseCase,
    ingest_documents::{
        IngestDocumentsError, IngestDocumentsRequest, IngestDocumentsResponse, UploadedDocument,
    },
};
use crate::presentation::http::dto::{ApiResponse, ErrorCode, IngestResponseDto};

pub struct IngestHandler {
    ingest_use_case: Arc<IngestDocumentsUseCase>,
}

impl IngestHandler {
    pub fn new(ingest_use_case: Arc<IngestDocumentsUseCase>) -> Self {
        Self { ingest_use_case }
    }

    /// Every multipart field carrying a file name is one uploaded document.
    pub async fn ingest_documents(
        State(handler): State<Arc<IngestHandler>>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, StatusCode> {
        let mut documents = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(|e| e.status())? {
            let Some(filename) = field.file_name().map(|name| name.to_string()) else {
                continue;
            };

            let data = field.bytes().await.map_err(|e| e.status())?.to_vec();
            documents.push(UploadedDocument { filename, data });
        }

        tracing::info!(documents = documents.len(), "Received upload");

        match handler
            .ingest_use_case
            .execute(IngestDocumentsRequest { documents })
            .await
        {
            Ok(response) => {
                let dto = IngestResponseDto::from(response);
                Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
            }
            Err(IngestDocumentsError::ValidationError(message)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<IngestResponseDto>::error(
                    ErrorCode::InvalidUpload,
                    message,
                    None,
                )),
            )),
            Err(IngestDocumentsError::Fatal { source, outcomes }) => {
                tracing::error!(error = %source, "Ingestion aborted");
                let completed = IngestResponseDto::from(IngestDocumentsResponse { outcomes });
                Ok((
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(
                        ApiResponse::error(
                            ErrorCode::IngestionAborted,
                            "Ingestion aborted",
                            Some(source.to_string()),
                        )
                        .with_data(completed),
                    ),
                ))
            }
        }
    }
}
