use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope for every JSON body the service returns. Failures set `error` and
/// may still carry `data` describing work that completed before the failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub timestamp: String,
}

/// Machine-readable failure kinds, serialized as `SCREAMING_SNAKE_CASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    EmptyQuery,
    InvalidUpload,
    InvalidPagination,
    DocumentNotFound,
    ServiceUnavailable,
    IngestionAborted,
    RetrievalFailed,
    GenerationFailed,
    SearchFailed,
    ListFailed,
    FetchFailed,
    DeleteFailed,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub version: String,
    pub vector_store: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedDocumentDto {
    pub document_id: Uuid,
    pub deleted: bool,
}
