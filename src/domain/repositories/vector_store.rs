use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Document, DocumentChunk};
use crate::domain::value_objects::EmbeddingVector;

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Invalid chunk: {0}")]
    InvalidChunk(String),
    #[error(
        "Duplicate chunk for document {document_id}: page {page_number}, index {chunk_index}"
    )]
    DuplicateChunk {
        document_id: Uuid,
        page_number: i32,
        chunk_index: i32,
    },
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),
    #[error("Vector store unavailable: {0}")]
    Unavailable(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl VectorStoreError {
    /// The store itself cannot be reached; nothing else in the request can succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VectorStoreError::Unavailable(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub distance: f64,
}

/// Persistence boundary for documents, chunks and their embeddings.
///
/// Every write is atomic: a reader sees either all of a document's chunks or
/// none of them, and never a chunk whose document is gone.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Writes the document row and all of its chunks in one transaction.
    async fn store_document(
        &self,
        document: &Document,
        chunks: &[DocumentChunk],
    ) -> Result<(), VectorStoreError>;

    /// Appends one chunk to an already stored document.
    async fn insert(&self, document_id: Uuid, chunk: &DocumentChunk)
    -> Result<(), VectorStoreError>;

    /// The `k` nearest chunks by cosine distance, earliest-inserted first on ties.
    async fn search(
        &self,
        query: &EmbeddingVector,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError>;

    /// Removes the document and all of its chunks. Returns whether it existed.
    async fn delete_document(&self, document_id: Uuid) -> Result<bool, VectorStoreError>;

    async fn find_document(&self, document_id: Uuid)
    -> Result<Option<Document>, VectorStoreError>;

    /// Newest first.
    async fn list_documents(
        &self,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Document>, VectorStoreError>;

    async fn count_documents(&self) -> Result<i64, VectorStoreError>;

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, VectorStoreError>;

    async fn health_check(&self) -> Result<bool, VectorStoreError>;

    fn embedding_dimension(&self) -> usize;
}

/// Checks shared by every backend before a chunk may be written.
pub fn validate_chunk(chunk: &DocumentChunk, dimension: usize) -> Result<(), VectorStoreError> {
    if chunk.is_empty() {
        return Err(VectorStoreError::InvalidChunk(
            "Chunk text cannot be empty".to_string(),
        ));
    }

    if chunk.page_number() < 1 {
        return Err(VectorStoreError::InvalidChunk(format!(
            "Page number must be 1-based, got {}",
            chunk.page_number()
        )));
    }

    if chunk.chunk_index() < 0 {
        return Err(VectorStoreError::InvalidChunk(format!(
            "Chunk index must be non-negative, got {}",
            chunk.chunk_index()
        )));
    }

    if !chunk.embedding().has_dimension(dimension) {
        return Err(VectorStoreError::DimensionMismatch {
            expected: dimension,
            actual: chunk.embedding().dimension(),
        });
    }

    Ok(())
}

/// Validates a whole document's chunk set, including slot uniqueness within it.
pub fn validate_document_chunks(
    document: &Document,
    chunks: &[DocumentChunk],
    dimension: usize,
) -> Result<(), VectorStoreError> {
    for (position, chunk) in chunks.iter().enumerate() {
        if !chunk.belongs_to_document(document.id()) {
            return Err(VectorStoreError::InvalidChunk(format!(
                "Chunk {} belongs to document {}, not {}",
                chunk.id(),
                chunk.document_id(),
                document.id()
            )));
        }

        validate_chunk(chunk, dimension)?;

        if chunks[..position]
            .iter()
            .any(|earlier| earlier.occupies_same_slot(chunk))
        {
            return Err(VectorStoreError::DuplicateChunk {
                document_id: chunk.document_id(),
                page_number: chunk.page_number(),
                chunk_index: chunk.chunk_index(),
            });
        }
    }

    Ok(())
}
