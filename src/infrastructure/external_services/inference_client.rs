use std::time::Duration;

use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Debug, Clone)]
pub struct InferenceClientConfig {
    /// Base of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_base_ms: u64,
    pub backoff_factor: f64,
}

impl InferenceClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_retries: 3,
            timeout_secs: 30,
            backoff_base_ms: 1000,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl InferenceError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InferenceError::Timeout(_)
                | InferenceError::RateLimited(_)
                | InferenceError::Unavailable(_)
                | InferenceError::Network(_)
        )
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

pub fn classify_status(status: StatusCode, body: &str) -> InferenceError {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    let message = format!("{status}: {detail}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InferenceError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => InferenceError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT => InferenceError::Unavailable(message),
        s if s.is_server_error() => InferenceError::Unavailable(message),
        _ => InferenceError::BadRequest(message),
    }
}

/// JSON-over-HTTPS client for OpenAI-compatible endpoints with bounded
/// timeouts and exponential backoff on transient failures.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: InferenceClientConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    pub async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, InferenceError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(path, request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempts <= self.config.max_retries => {
                    let backoff_time = Duration::from_millis(
                        (self.config.backoff_base_ms as f64
                            * self.config.backoff_factor.powi(attempts as i32 - 1))
                            as u64,
                    );
                    tracing::warn!(
                        path,
                        attempt = attempts,
                        error = %e,
                        backoff_ms = backoff_time.as_millis() as u64,
                        "Retrying provider request"
                    );
                    tokio::time::sleep(backoff_time).await;
                }
                Err(e) => {
                    tracing::error!(path, attempts, error = %e, "Provider request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn execute_request<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, InferenceError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| InferenceError::Parse(e.without_url().to_string()))
    }

    fn map_transport_error(&self, error: ReqwestError) -> InferenceError {
        if error.is_timeout() {
            InferenceError::Timeout(self.timeout())
        } else {
            InferenceError::Network(error.without_url().to_string())
        }
    }
}
