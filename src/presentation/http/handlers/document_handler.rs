use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    DeleteDocumentUseCase, GetDocumentUseCase, ListDocumentsUseCase,
    delete_document::DeleteDocumentError,
    get_document::GetDocumentError,
    list_documents::{ListDocumentsError, ListDocumentsRequest},
};
use crate::presentation::http::dto::{
    ApiResponse, DeletedDocumentDto, DocumentDetailResponseDto, DocumentListResponseDto,
    ErrorCode, PaginationDto,
};

pub struct DocumentHandler {
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    get_document_use_case: Arc<GetDocumentUseCase>,
    delete_document_use_case: Arc<DeleteDocumentUseCase>,
}

impl DocumentHandler {
    pub fn new(
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        get_document_use_case: Arc<GetDocumentUseCase>,
        delete_document_use_case: Arc<DeleteDocumentUseCase>,
    ) -> Self {
        Self {
            list_documents_use_case,
            get_document_use_case,
            delete_document_use_case,
        }
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
        Query(pagination): Query<PaginationDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = ListDocumentsRequest {
            skip: pagination.skip,
            limit: pagination.limit,
        };

        match handler.list_documents_use_case.execute(request).await {
            Ok(response) => {
                let dto = DocumentListResponseDto::from(response);
                Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
            }
            Err(ListDocumentsError::ValidationError(message)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<DocumentListResponseDto>::error(
                    ErrorCode::InvalidPagination,
                    message,
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<DocumentListResponseDto>::error(
                    ErrorCode::ListFailed,
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn get_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.get_document_use_case.execute(document_id).await {
            Ok(response) => {
                let dto = DocumentDetailResponseDto::from(response);
                Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
            }
            Err(e @ GetDocumentError::NotFound(_)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    ErrorCode::DocumentNotFound,
                    e.to_string(),
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    ErrorCode::FetchFailed,
                    e.to_string(),
                    None,
                )),
            )),
        }
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.delete_document_use_case.execute(document_id).await {
            Ok(()) => {
                tracing::info!(%document_id, "Document deleted");
                Ok((
                    StatusCode::OK,
                    Json(ApiResponse::success(DeletedDocumentDto {
                        document_id,
                        deleted: true,
                    })),
                ))
            }
            Err(e @ DeleteDocumentError::NotFound(_)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    ErrorCode::DocumentNotFound,
                    e.to_string(),
                    None,
                )),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    ErrorCode::DeleteFailed,
                    e.to_string(),
                    None,
                )),
            )),
        }
    }
}
