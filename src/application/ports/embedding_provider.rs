use std::time::Duration;

use async_trait::async_trait;

use crate::domain::value_objects::EmbeddingVector;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Embedding request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Invalid input at index {index}: {message}")]
    InvalidInput { index: usize, message: String },
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Request rejected by provider: {0}")]
    Rejected(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl EmbeddingError {
    /// Transient provider trouble; the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::Timeout(_)
                | EmbeddingError::RateLimitExceeded
                | EmbeddingError::ServiceUnavailable(_)
                | EmbeddingError::NetworkError(_)
        )
    }

    /// Misconfiguration; every later call would fail the same way.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EmbeddingError::AuthenticationFailed(_))
    }
}

/// Maps text to fixed-dimension vectors. Implementations hold no pipeline state.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;

    /// One vector per input, in input order. Either every input is embedded
    /// or the whole call fails.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError>;

    fn model_name(&self) -> &str;

    fn embedding_dimension(&self) -> usize;

    fn max_input_length(&self) -> usize;
}
