use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::EmbeddingProvider;
use crate::application::ports::embedding_provider::EmbeddingError;
use crate::domain::value_objects::EmbeddingVector;
use crate::infrastructure::external_services::inference_client::{InferenceClient, InferenceError};

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl From<InferenceError> for EmbeddingError {
    fn from(error: InferenceError) -> Self {
        match error {
            InferenceError::Timeout(after) => EmbeddingError::Timeout(after),
            InferenceError::RateLimited(_) => EmbeddingError::RateLimitExceeded,
            InferenceError::Unavailable(msg) => EmbeddingError::ServiceUnavailable(msg),
            InferenceError::Network(msg) => EmbeddingError::NetworkError(msg),
            InferenceError::Unauthorized(msg) => EmbeddingError::AuthenticationFailed(msg),
            InferenceError::BadRequest(msg) => EmbeddingError::Rejected(msg),
            InferenceError::Parse(msg) => EmbeddingError::MalformedResponse(msg),
        }
    }
}

/// Embeddings from an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAIEmbeddingProvider {
    client: InferenceClient,
    model: String,
    dimension: usize,
    max_input_chars: usize,
}

impl OpenAIEmbeddingProvider {
    pub fn new(
        client: InferenceClient,
        model: impl Into<String>,
        dimension: usize,
        max_input_chars: usize,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            dimension,
            max_input_chars,
        }
    }

    fn validate_inputs(&self, texts: &[String]) -> Result<(), EmbeddingError> {
        for (index, text) in texts.iter().enumerate() {
            if text.trim().is_empty() {
                return Err(EmbeddingError::InvalidInput {
                    index,
                    message: "Input text is empty".to_string(),
                });
            }

            let length = text.chars().count();
            if length > self.max_input_chars {
                return Err(EmbeddingError::InvalidInput {
                    index,
                    message: format!(
                        "Input is {} characters, limit is {}",
                        length, self.max_input_chars
                    ),
                });
            }
        }
        Ok(())
    }

    /// Only the `text-embedding-3` family accepts a requested output size.
    fn requested_dimensions(&self) -> Option<usize> {
        self.model
            .starts_with("text-embedding-3")
            .then_some(self.dimension)
    }
}

/// Puts response items back in input order using their `index` field.
fn order_by_index(
    mut data: Vec<EmbeddingData>,
    expected: usize,
) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
    if data.len() != expected {
        return Err(EmbeddingError::MalformedResponse(format!(
            "expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }

    data.sort_by_key(|item| item.index);
    if data.iter().enumerate().any(|(position, item)| item.index != position) {
        return Err(EmbeddingError::MalformedResponse(
            "response indices do not cover the input".to_string(),
        ));
    }

    Ok(data
        .into_iter()
        .map(|item| EmbeddingVector::new(item.embedding))
        .collect())
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::MalformedResponse("empty response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.validate_inputs(texts)?;

        tracing::debug!(
            provider = "OpenAI",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts,
            dimensions: self.requested_dimensions(),
        };
        let response: EmbeddingsResponse = self.client.post_json("embeddings", &request).await?;

        order_by_index(response.data, texts.len())
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    fn max_input_length(&self) -> usize {
        self.max_input_chars
    }
}
