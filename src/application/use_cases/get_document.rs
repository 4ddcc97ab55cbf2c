use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::repositories::{VectorStore, VectorStoreError};

#[derive(Debug, thiserror::Error)]
pub enum GetDocumentError {
    #[error("Document not found: {0}")]
    NotFound(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] VectorStoreError),
}

#[derive(Debug, Clone)]
pub struct GetDocumentResponse {
    pub document: Document,
    pub total_chunks: i64,
}

pub struct GetDocumentUseCase {
    vector_store: Arc<dyn VectorStore>,
}

impl GetDocumentUseCase {
    pub fn new(vector_store: Arc<dyn VectorStore>) -> Self {
        Self { vector_store }
    }

    pub async fn execute(&self, document_id: Uuid) -> Result<GetDocumentResponse, GetDocumentError> {
        let document = self
            .vector_store
            .find_document(document_id)
            .await?
            .ok_or(GetDocumentError::NotFound(document_id))?;
        let total_chunks = self.vector_store.count_chunks(document_id).await?;

        Ok(GetDocumentResponse {
            document,
            total_chunks,
        })
    }
}
