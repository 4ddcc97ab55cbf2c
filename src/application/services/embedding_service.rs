use std::sync::Arc;

use crate::application::ports::EmbeddingProvider;
use crate::application::ports::embedding_provider::EmbeddingError;
use crate::domain::value_objects::EmbeddingVector;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingServiceError {
    #[error("Provider error: {0}")]
    Provider(#[from] EmbeddingError),
    #[error("Provider returned {actual} embeddings for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },
    #[error("Embedding {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

impl EmbeddingServiceError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, EmbeddingServiceError::Provider(e) if e.is_fatal())
    }
}

/// Batches texts through the provider and checks every returned vector
/// against the configured dimension before anything can be stored.
pub struct EmbeddingService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    dimension: usize,
}

impl EmbeddingService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        batch_size: usize,
        dimension: usize,
    ) -> Self {
        Self {
            embedding_provider,
            batch_size: batch_size.max(1),
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        self.embedding_provider.model_name()
    }

    pub async fn embed_query(&self, text: &str) -> Result<EmbeddingVector, EmbeddingServiceError> {
        let embedding = self.embedding_provider.embed(text).await?;
        self.check_dimension(0, &embedding)?;
        Ok(embedding)
    }

    /// One vector per text, in order, using `ceil(len / batch_size)` provider calls.
    pub async fn embed_texts(
        &self,
        texts: &[String],
    ) -> Result<Vec<EmbeddingVector>, EmbeddingServiceError> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for (batch_number, batch) in texts.chunks(self.batch_size).enumerate() {
            let offset = batch_number * self.batch_size;

            let batch_embeddings = self
                .embedding_provider
                .embed_batch(batch)
                .await
                .map_err(|e| match e {
                    EmbeddingError::InvalidInput { index, message } => {
                        EmbeddingError::InvalidInput {
                            index: offset + index,
                            message,
                        }
                    }
                    other => other,
                })?;

            if batch_embeddings.len() != batch.len() {
                return Err(EmbeddingServiceError::CountMismatch {
                    expected: batch.len(),
                    actual: batch_embeddings.len(),
                });
            }

            tracing::debug!(
                batch = batch_number,
                size = batch.len(),
                model = self.model_name(),
                "Embedded batch"
            );

            embeddings.extend(batch_embeddings);
        }

        for (index, embedding) in embeddings.iter().enumerate() {
            self.check_dimension(index, embedding)?;
        }

        Ok(embeddings)
    }

    fn check_dimension(
        &self,
        index: usize,
        embedding: &EmbeddingVector,
    ) -> Result<(), EmbeddingServiceError> {
        if embedding.has_dimension(self.dimension) {
            Ok(())
        } else {
            Err(EmbeddingServiceError::DimensionMismatch {
                index,
                expected: self.dimension,
                actual: embedding.dimension(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingEmbedder, VocabularyEmbedder};

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("alpha {i}")).collect()
    }

    #[tokio::test]
    async fn test_embed_texts_uses_minimal_batches() {
        let provider = Arc::new(VocabularyEmbedder::new());
        let service = EmbeddingService::new(provider.clone(), 4, provider.embedding_dimension());

        let embeddings = service.embed_texts(&texts(10)).await.unwrap();

        assert_eq!(embeddings.len(), 10);
        assert_eq!(provider.batch_calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let provider = Arc::new(VocabularyEmbedder::new());
        let service = EmbeddingService::new(provider.clone(), 4, provider.embedding_dimension());

        assert!(service.embed_texts(&[]).await.unwrap().is_empty());
        assert_eq!(provider.batch_calls(), 0);
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_rejected() {
        let provider = Arc::new(VocabularyEmbedder::new());
        let service = EmbeddingService::new(provider.clone(), 4, provider.embedding_dimension() + 1);

        let err = service.embed_texts(&texts(2)).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingServiceError::DimensionMismatch { index: 0, .. }
        ));

        let err = service.embed_query("alpha").await.unwrap_err();
        assert!(matches!(err, EmbeddingServiceError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_invalid_input_index_is_relative_to_the_whole_input() {
        let mut inputs = texts(6);
        inputs[5] = String::new();
        let provider = Arc::new(VocabularyEmbedder::new());
        let service = EmbeddingService::new(provider.clone(), 4, provider.embedding_dimension());

        let err = service.embed_texts(&inputs).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingServiceError::Provider(EmbeddingError::InvalidInput { index: 5, .. })
        ));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_authentication_failure_is_fatal() {
        let service = EmbeddingService::new(Arc::new(FailingEmbedder::authentication()), 4, 8);

        let err = service.embed_texts(&texts(1)).await.unwrap_err();
        assert!(err.is_fatal());
    }
}
