//! Deterministic fakes shared by unit tests across layers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::ports::document_extractor::{DocumentExtractionError, ExtractedDocument};
use crate::application::ports::embedding_provider::EmbeddingError;
use crate::application::ports::language_model::{
    GenerationError, GenerationRequest, GenerationResponse,
};
use crate::application::ports::{DocumentExtractor, EmbeddingProvider, LanguageModel};
use crate::application::services::EmbeddingService;
use crate::domain::entities::{ChunkDraft, Document, DocumentChunk};
use crate::domain::repositories::VectorStore;
use crate::domain::value_objects::{ContentHash, EmbeddingVector};
use crate::infrastructure::memory::InMemoryVectorStore;

const VOCABULARY: [&str; 8] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
];

/// Text containing this word embeds to a vector one component too long.
pub const MALFORMED_MARKER: &str = "MALFORMED";

/// A batch containing this word is refused as if the API key were revoked.
pub const UNAUTHORIZED_MARKER: &str = "UNAUTHORIZED";

/// Bag-of-words over a fixed Greek-letter vocabulary, case-insensitive.
pub struct VocabularyEmbedder {
    batch_calls: AtomicUsize,
}

impl VocabularyEmbedder {
    pub fn new() -> Self {
        Self {
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn vectorize(text: &str) -> EmbeddingVector {
        let mut values = vec![0.0; VOCABULARY.len()];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
        {
            if let Some(slot) = VOCABULARY.iter().position(|v| *v == word) {
                values[slot] += 1.0;
            }
        }
        if text.contains(MALFORMED_MARKER) {
            values.push(0.0);
        }
        EmbeddingVector::new(values)
    }
}

#[async_trait]
impl EmbeddingProvider for VocabularyEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        Ok(vectors.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(index) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::InvalidInput {
                index,
                message: "Input text is empty".to_string(),
            });
        }
        if texts.iter().any(|t| t.contains(UNAUTHORIZED_MARKER)) {
            return Err(EmbeddingError::AuthenticationFailed(
                "api key revoked".to_string(),
            ));
        }
        Ok(texts.iter().map(|t| Self::vectorize(t)).collect())
    }

    fn model_name(&self) -> &str {
        "vocabulary"
    }

    fn embedding_dimension(&self) -> usize {
        VOCABULARY.len()
    }

    fn max_input_length(&self) -> usize {
        usize::MAX
    }
}

/// Rejects every call the way a provider does with a bad API key.
pub struct FailingEmbedder {
    error: fn() -> EmbeddingError,
}

impl FailingEmbedder {
    pub fn authentication() -> Self {
        Self {
            error: || EmbeddingError::AuthenticationFailed("invalid api key".to_string()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Err((self.error)())
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        Err((self.error)())
    }

    fn model_name(&self) -> &str {
        "failing"
    }

    fn embedding_dimension(&self) -> usize {
        8
    }

    fn max_input_length(&self) -> usize {
        usize::MAX
    }
}

/// Answers every prompt with fixed text and keeps the requests it saw.
pub struct RecordingLanguageModel {
    reply: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl RecordingLanguageModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for RecordingLanguageModel {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        self.requests.lock().unwrap().push(request);
        Ok(GenerationResponse {
            text: self.reply.clone(),
            model: "recording".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

pub struct FailingLanguageModel;

#[async_trait]
impl LanguageModel for FailingLanguageModel {
    async fn generate(
        &self,
        _request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        Err(GenerationError::ServiceUnavailable("model offline".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Reads the fake PDFs built by [`pdf_bytes`]: a `%PDF-` header line, then
/// pages separated by form feeds.
pub struct PlainTextExtractor {
    calls: AtomicUsize,
}

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(&self, data: &[u8]) -> Result<ExtractedDocument, DocumentExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let text = std::str::from_utf8(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;
        let body = text
            .strip_prefix("%PDF-")
            .and_then(|rest| rest.split_once('\n'))
            .map(|(_, body)| body)
            .ok_or_else(|| DocumentExtractionError::CorruptedFile("missing header".to_string()))?;

        Ok(ExtractedDocument::from_pages(
            body.split('\x0c').map(str::to_string).collect(),
        ))
    }

    fn can_extract(&self, file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(".pdf")
    }
}

pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    format!("%PDF-1.4\n{}", pages.join("\x0c")).into_bytes()
}

/// Stores one chunk per page, embedded with `service`, and returns the document.
pub async fn seed_document(
    store: &InMemoryVectorStore,
    service: &EmbeddingService,
    filename: &str,
    pages: &[&str],
) -> Document {
    let document = Document::new(
        filename.to_string(),
        pages.len() as i32,
        ContentHash::from_bytes(filename.as_bytes()),
    );

    let texts: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
    let embeddings = service.embed_texts(&texts).await.unwrap();
    let chunks: Vec<DocumentChunk> = texts
        .into_iter()
        .zip(embeddings)
        .enumerate()
        .map(|(page, (text, embedding))| {
            DocumentChunk::new(
                document.id(),
                ChunkDraft {
                    text,
                    page_number: page as i32 + 1,
                    chunk_index: 0,
                },
                embedding,
            )
        })
        .collect();

    store.store_document(&document, &chunks).await.unwrap();
    document
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
