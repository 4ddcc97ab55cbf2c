use std::sync::Arc;

use crate::application::services::embedding_service::{EmbeddingService, EmbeddingServiceError};
use crate::domain::entities::RetrievedChunk;
use crate::domain::repositories::{VectorStore, VectorStoreError};

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Embedding(#[from] EmbeddingServiceError),
    #[error(transparent)]
    Store(#[from] VectorStoreError),
}

impl RetrievalError {
    /// A dependency is down or misconfigured, as opposed to a bad request.
    pub fn is_unavailable(&self) -> bool {
        match self {
            RetrievalError::InvalidInput(_) => false,
            RetrievalError::Embedding(EmbeddingServiceError::Provider(e)) => {
                e.is_fatal() || e.is_retryable()
            }
            RetrievalError::Embedding(_) => false,
            RetrievalError::Store(e) => e.is_fatal(),
        }
    }
}

pub struct Retriever {
    embedding_service: Arc<EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(embedding_service: Arc<EmbeddingService>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedding_service,
            vector_store,
        }
    }

    /// The `top_k` chunks closest to `question`, best first.
    pub async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RetrievalError::InvalidInput(
                "Question cannot be empty".to_string(),
            ));
        }
        if top_k == 0 {
            return Err(RetrievalError::InvalidInput(
                "top_k must be at least 1".to_string(),
            ));
        }

        let query_embedding = self.embedding_service.embed_query(question).await?;
        let scored = self.vector_store.search(&query_embedding, top_k).await?;

        tracing::debug!(top_k, found = scored.len(), "Retrieved chunks");

        Ok(scored
            .into_iter()
            .map(|hit| hit.chunk.into_retrieved(hit.distance))
            .collect())
    }
}
