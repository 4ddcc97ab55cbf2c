use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::ContentHash;

/// An ingested PDF. Immutable once stored; removed only by explicit deletion,
/// which cascades to its chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    filename: String,
    total_pages: i32,
    content_hash: ContentHash,
    created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(filename: String, total_pages: i32, content_hash: ContentHash) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            total_pages,
            content_hash,
            created_at: Utc::now(),
        }
    }

    /// Rehydrates a stored document without minting a new identity.
    pub fn restore(
        id: Uuid,
        filename: String,
        total_pages: i32,
        content_hash: ContentHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            filename,
            total_pages,
            content_hash,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn total_pages(&self) -> i32 {
        self.total_pages
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
