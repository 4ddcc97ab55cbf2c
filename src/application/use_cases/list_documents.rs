use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::{VectorStore, VectorStoreError};

#[derive(Debug, thiserror::Error)]
pub enum ListDocumentsError {
    #[error("Repository error: {0}")]
    RepositoryError(#[from] VectorStoreError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct ListDocumentsRequest {
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct ListDocumentsResponse {
    pub documents: Vec<Document>,
    pub total_count: i64,
    pub skip: i64,
    pub limit: i64,
}

pub struct ListDocumentsUseCase {
    vector_store: Arc<dyn VectorStore>,
}

impl ListDocumentsUseCase {
    pub fn new(vector_store: Arc<dyn VectorStore>) -> Self {
        Self { vector_store }
    }

    pub async fn execute(
        &self,
        request: ListDocumentsRequest,
    ) -> Result<ListDocumentsResponse, ListDocumentsError> {
        if request.skip < 0 {
            return Err(ListDocumentsError::ValidationError(
                "Skip cannot be negative".to_string(),
            ));
        }

        if request.limit <= 0 || request.limit > 1000 {
            return Err(ListDocumentsError::ValidationError(
                "Limit must be between 1 and 1000".to_string(),
            ));
        }

        let documents = self
            .vector_store
            .list_documents(request.skip, request.limit)
            .await?;
        let total_count = self.vector_store.count_documents().await?;

        Ok(ListDocumentsResponse {
            documents,
            total_count,
            skip: request.skip,
            limit: request.limit,
        })
    }
}
