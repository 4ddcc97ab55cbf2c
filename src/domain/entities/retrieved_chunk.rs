use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-facing retrieval result. Deliberately carries no embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub document_id: Uuid,
    pub page_number: i32,
    pub chunk_index: i32,
    /// Cosine distance to the query; smaller is closer.
    pub distance: f64,
}
