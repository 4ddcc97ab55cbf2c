use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::get_document::GetDocumentResponse;
use crate::application::use_cases::list_documents::ListDocumentsResponse;
use crate::domain::entities::Document;

#[derive(Debug, Deserialize)]
pub struct PaginationDto {
    #[serde(default = "default_skip")]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_skip() -> i64 {
    0
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMetaDto {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponseDto {
    pub id: Uuid,
    pub filename: String,
    pub total_pages: i32,
    pub content_hash: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentResponseDto>,
    pub meta: PaginationMetaDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentDetailResponseDto {
    #[serde(flatten)]
    pub document: DocumentResponseDto,
    pub total_chunks: i64,
}

impl From<Document> for DocumentResponseDto {
    fn from(document: Document) -> Self {
        Self {
            id: document.id(),
            filename: document.filename().to_string(),
            total_pages: document.total_pages(),
            content_hash: document.content_hash().as_str().to_string(),
            created_at: document.created_at().to_rfc3339(),
        }
    }
}

impl From<ListDocumentsResponse> for DocumentListResponseDto {
    fn from(response: ListDocumentsResponse) -> Self {
        Self {
            documents: response
                .documents
                .into_iter()
                .map(DocumentResponseDto::from)
                .collect(),
            meta: PaginationMetaDto {
                offset: response.skip,
                limit: response.limit,
                total: response.total_count,
            },
        }
    }
}

impl From<GetDocumentResponse> for DocumentDetailResponseDto {
    fn from(response: GetDocumentResponse) -> Self {
        Self {
            document: DocumentResponseDto::from(response.document),
            total_chunks: response.total_chunks,
        }
    }
}
