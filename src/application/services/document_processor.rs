use std::sync::Arc;

use crate::application::ports::DocumentExtractor;
use crate::application::ports::document_extractor::DocumentExtractionError;
use crate::application::services::embedding_service::{EmbeddingService, EmbeddingServiceError};
use crate::application::services::text_chunker::RTSplitter;
use crate::domain::entities::{Document, DocumentChunk};
use crate::domain::repositories::{VectorStore, VectorStoreError};
use crate::domain::value_objects::ContentHash;

#[derive(Debug, thiserror::Error)]
pub enum DocumentProcessingError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] DocumentExtractionError),
    #[error("Document contains no extractable text")]
    EmptyDocument,
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingServiceError),
    #[error("Storage error: {0}")]
    Store(#[from] VectorStoreError),
}

impl DocumentProcessingError {
    /// Failures that doom every other document in the same request too.
    pub fn is_fatal(&self) -> bool {
        match self {
            DocumentProcessingError::Embedding(e) => e.is_fatal(),
            DocumentProcessingError::Store(e) => e.is_fatal(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub document: Document,
    pub total_chunks: usize,
    pub failed_pages: Vec<u32>,
}

/// Extract, chunk, embed and store one document. Nothing is written unless
/// every chunk embedded cleanly.
pub struct DocumentProcessorService {
    document_extractor: Arc<dyn DocumentExtractor>,
    splitter: RTSplitter,
    embedding_service: Arc<EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
}

impl DocumentProcessorService {
    pub fn new(
        document_extractor: Arc<dyn DocumentExtractor>,
        splitter: RTSplitter,
        embedding_service: Arc<EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            document_extractor,
            splitter,
            embedding_service,
            vector_store,
        }
    }

    pub fn accepts(&self, filename: &str) -> bool {
        self.document_extractor.can_extract(filename)
    }

    pub async fn process(
        &self,
        filename: &str,
        data: &[u8],
    ) -> Result<ProcessedDocument, DocumentProcessingError> {
        let extracted = self.document_extractor.extract(data).await?;
        if !extracted.failed_pages.is_empty() {
            tracing::warn!(
                filename,
                failed_pages = ?extracted.failed_pages,
                "Some pages could not be extracted"
            );
        }

        let drafts = self.splitter.chunk_pages(&extracted.pages);
        if drafts.is_empty() {
            return Err(DocumentProcessingError::EmptyDocument);
        }

        let texts: Vec<String> = drafts.iter().map(|draft| draft.text.clone()).collect();
        let embeddings = self.embedding_service.embed_texts(&texts).await?;

        let document = Document::new(
            filename.to_string(),
            extracted.total_pages() as i32,
            ContentHash::from_bytes(data),
        );
        let chunks: Vec<DocumentChunk> = drafts
            .into_iter()
            .zip(embeddings)
            .map(|(draft, embedding)| DocumentChunk::new(document.id(), draft, embedding))
            .collect();

        self.vector_store.store_document(&document, &chunks).await?;

        tracing::info!(
            document_id = %document.id(),
            filename,
            pages = document.total_pages(),
            chunks = chunks.len(),
            "Stored document"
        );

        Ok(ProcessedDocument {
            total_chunks: chunks.len(),
            failed_pages: extracted.failed_pages,
            document,
        })
    }
}
