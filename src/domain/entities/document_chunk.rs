use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::RetrievedChunk;
use crate::domain::value_objects::EmbeddingVector;

/// Chunker output: a passage with provenance but no embedding yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDraft {
    pub text: String,
    /// 1-based.
    pub page_number: i32,
    /// 0-based position within the page.
    pub chunk_index: i32,
}

/// A stored passage. Only the vector store and the ingestion pipeline ever
/// see the embedding; everything downstream gets a [`RetrievedChunk`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    id: Uuid,
    document_id: Uuid,
    text: String,
    page_number: i32,
    chunk_index: i32,
    embedding: EmbeddingVector,
    created_at: DateTime<Utc>,
}

impl DocumentChunk {
    pub fn new(document_id: Uuid, draft: ChunkDraft, embedding: EmbeddingVector) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            text: draft.text,
            page_number: draft.page_number,
            chunk_index: draft.chunk_index,
            embedding,
            created_at: Utc::now(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        text: String,
        page_number: i32,
        chunk_index: i32,
        embedding: EmbeddingVector,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_id,
            text,
            page_number,
            chunk_index,
            embedding,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page_number(&self) -> i32 {
        self.page_number
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn embedding(&self) -> &EmbeddingVector {
        &self.embedding
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn belongs_to_document(&self, document_id: Uuid) -> bool {
        self.document_id == document_id
    }

    /// Same (document, page, index) slot.
    pub fn occupies_same_slot(&self, other: &DocumentChunk) -> bool {
        self.document_id == other.document_id
            && self.page_number == other.page_number
            && self.chunk_index == other.chunk_index
    }

    /// Drops the embedding.
    pub fn into_retrieved(self, distance: f64) -> RetrievedChunk {
        RetrievedChunk {
            text: self.text,
            document_id: self.document_id,
            page_number: self.page_number,
            chunk_index: self.chunk_index,
            distance,
        }
    }
}
