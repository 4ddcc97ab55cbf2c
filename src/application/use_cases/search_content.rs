use std::sync::Arc;

use crate::application::services::Retriever;
use crate::application::services::retriever::RetrievalError;
use crate::domain::entities::RetrievedChunk;

#[derive(Debug, thiserror::Error)]
pub enum SearchContentError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Search failed: {0}")]
    RetrievalError(RetrievalError),
}

impl From<RetrievalError> for SearchContentError {
    fn from(error: RetrievalError) -> Self {
        match error {
            RetrievalError::InvalidInput(msg) => SearchContentError::ValidationError(msg),
            other => SearchContentError::RetrievalError(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchContentRequest {
    pub query: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SearchContentResponse {
    pub query: String,
    pub results: Vec<RetrievedChunk>,
    pub search_time_ms: u64,
}

/// Retrieval without synthesis.
pub struct SearchContentUseCase {
    retriever: Arc<Retriever>,
    default_top_k: usize,
}

impl SearchContentUseCase {
    pub fn new(retriever: Arc<Retriever>, default_top_k: usize) -> Self {
        Self {
            retriever,
            default_top_k,
        }
    }

    pub async fn execute(
        &self,
        request: SearchContentRequest,
    ) -> Result<SearchContentResponse, SearchContentError> {
        let start_time = std::time::Instant::now();

        let top_k = request.top_k.unwrap_or(self.default_top_k);
        if top_k > 100 {
            return Err(SearchContentError::ValidationError(
                "top_k must be between 1 and 100".to_string(),
            ));
        }

        let results = self.retriever.retrieve(&request.query, top_k).await?;

        Ok(SearchContentResponse {
            query: request.query,
            results,
            search_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::EmbeddingProvider;
    use crate::application::services::EmbeddingService;
    use crate::infrastructure::memory::InMemoryVectorStore;
    use crate::test_support::{VocabularyEmbedder, seed_document};

    #[tokio::test]
    async fn test_search_returns_ranked_chunks() {
        let provider = Arc::new(VocabularyEmbedder::new());
        let dimension = provider.embedding_dimension();
        let store = Arc::new(InMemoryVectorStore::new(dimension));
        let service = Arc::new(EmbeddingService::new(provider, 64, dimension));
        seed_document(&store, &service, "a.pdf", &["Alpha Beta", "Delta"]).await;
        let use_case = SearchContentUseCase::new(Arc::new(Retriever::new(service, store)), 5);

        let response = use_case
            .execute(SearchContentRequest {
                query: "delta".to_string(),
                top_k: None,
            })
            .await
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].text, "Delta");

        let too_many = use_case
            .execute(SearchContentRequest {
                query: "delta".to_string(),
                top_k: Some(101),
            })
            .await;
        assert!(matches!(too_many, Err(SearchContentError::ValidationError(_))));
    }
}
