use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Model returned an empty completion")]
    EmptyCompletion,
}

impl GenerationError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Timeout(_)
                | GenerationError::RateLimitExceeded
                | GenerationError::ServiceUnavailable(_)
                | GenerationError::NetworkError(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    pub text: String,
    pub model: String,
}

/// Single-shot chat completion against an external model provider.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;

    fn model_name(&self) -> &str;
}
