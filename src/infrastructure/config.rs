use std::str::FromStr;

use crate::infrastructure::database::EMBEDDING_COLUMN_DIMENSION;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorStoreBackend {
    Postgres,
    Memory,
}

impl FromStr for VectorStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pgvector" => Ok(VectorStoreBackend::Postgres),
            "memory" | "in-memory" | "inmemory" => Ok(VectorStoreBackend::Memory),
            other => Err(format!("unknown backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub vector_store_backend: VectorStoreBackend,
    pub database_url: Option<String>,
    pub database_pool_size: u32,

    pub openai_api_key: String,
    pub openai_base_url: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub embedding_batch_size: usize,
    pub embedding_max_input_chars: usize,
    pub chat_model: String,
    pub generation_temperature: f32,
    pub generation_max_tokens: u32,
    pub provider_timeout_secs: u64,
    pub provider_max_retries: u32,

    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_top_k: usize,
    pub max_context_chars: usize,
    pub source_preview_chars: usize,
    pub min_documents_per_upload: usize,

    pub api_port: u16,
    pub max_upload_bytes: usize,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, applying defaults
    /// for everything optional.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let vector_store_backend = parse_or(&get, "VECTOR_STORE_BACKEND", VectorStoreBackend::Postgres)?;
        let database_url = get("DATABASE_URL");
        if vector_store_backend == VectorStoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let config = Self {
            vector_store_backend,
            database_url,
            database_pool_size: parse_or(&get, "DATABASE_POOL_SIZE", 10)?,

            openai_api_key: get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),
            embedding_dimension: parse_or(&get, "EMBEDDING_DIMENSION", 1536)?,
            embedding_batch_size: parse_or(&get, "EMBEDDING_BATCH_SIZE", 64)?,
            embedding_max_input_chars: parse_or(&get, "EMBEDDING_MAX_INPUT_CHARS", 8000)?,
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            generation_temperature: parse_or(&get, "GENERATION_TEMPERATURE", 0.2)?,
            generation_max_tokens: parse_or(&get, "GENERATION_MAX_TOKENS", 1000)?,
            provider_timeout_secs: parse_or(&get, "PROVIDER_TIMEOUT_SECS", 30)?,
            provider_max_retries: parse_or(&get, "PROVIDER_MAX_RETRIES", 3)?,

            chunk_size: parse_or(&get, "CHUNK_SIZE", 1000)?,
            chunk_overlap: parse_or(&get, "CHUNK_OVERLAP", 200)?,
            retrieval_top_k: parse_or(&get, "RETRIEVAL_TOP_K", 5)?,
            max_context_chars: parse_or(&get, "MAX_CONTEXT_CHARS", 12_000)?,
            source_preview_chars: parse_or(&get, "SOURCE_PREVIEW_CHARS", 200)?,
            min_documents_per_upload: parse_or(&get, "MIN_DOCUMENTS_PER_UPLOAD", 2)?,

            api_port: parse_or(&get, "API_PORT", 8000)?,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
            request_timeout_secs: parse_or(&get, "REQUEST_TIMEOUT_SECS", 120)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("DATABASE_POOL_SIZE", self.database_pool_size as usize),
            ("EMBEDDING_DIMENSION", self.embedding_dimension),
            ("EMBEDDING_BATCH_SIZE", self.embedding_batch_size),
            ("EMBEDDING_MAX_INPUT_CHARS", self.embedding_max_input_chars),
            ("CHUNK_SIZE", self.chunk_size),
            ("RETRIEVAL_TOP_K", self.retrieval_top_k),
            ("MAX_CONTEXT_CHARS", self.max_context_chars),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid {
                key: *key,
                message: "must be greater than zero".to_string(),
            });
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::Invalid {
                key: "CHUNK_OVERLAP",
                message: format!(
                    "overlap {} must be smaller than chunk size {}",
                    self.chunk_overlap, self.chunk_size
                ),
            });
        }

        if self.vector_store_backend == VectorStoreBackend::Postgres
            && self.embedding_dimension != EMBEDDING_COLUMN_DIMENSION
        {
            return Err(ConfigError::Invalid {
                key: "EMBEDDING_DIMENSION",
                message: format!(
                    "postgres embedding column holds {} dimensions, got {}",
                    EMBEDDING_COLUMN_DIMENSION, self.embedding_dimension
                ),
            });
        }

        if !(0.0..=2.0).contains(&self.generation_temperature) {
            return Err(ConfigError::Invalid {
                key: "GENERATION_TEMPERATURE",
                message: "must be between 0 and 2".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
