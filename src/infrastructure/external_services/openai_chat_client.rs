use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::LanguageModel;
use crate::application::ports::language_model::{
    GenerationError, GenerationRequest, GenerationResponse,
};
use crate::infrastructure::external_services::inference_client::{
    InferenceClient, InferenceClientConfig, InferenceError,
};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl From<InferenceError> for GenerationError {
    fn from(error: InferenceError) -> Self {
        match error {
            InferenceError::Timeout(after) => GenerationError::Timeout(after),
            InferenceError::RateLimited(_) => GenerationError::RateLimitExceeded,
            InferenceError::Unavailable(msg) => GenerationError::ServiceUnavailable(msg),
            InferenceError::Network(msg) => GenerationError::NetworkError(msg),
            InferenceError::Unauthorized(msg) => GenerationError::AuthenticationFailed(msg),
            InferenceError::BadRequest(msg) | InferenceError::Parse(msg) => {
                GenerationError::ApiError(msg)
            }
        }
    }
}

/// Chat completions from an OpenAI-compatible `/chat/completions` endpoint.
/// Each generation is a single attempt; failures go straight to the caller.
pub struct OpenAIChatModel {
    client: InferenceClient,
    model: String,
}

impl OpenAIChatModel {
    pub fn new(
        mut config: InferenceClientConfig,
        model: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        config.max_retries = 0;

        Ok(Self {
            client: InferenceClient::new(config)?,
            model: model.into(),
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response: ChatCompletionResponse =
            self.client.post_json("chat/completions", &body).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyCompletion)?;

        Ok(GenerationResponse {
            text,
            model: response.model.unwrap_or_else(|| self.model.clone()),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
