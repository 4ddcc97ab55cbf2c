pub mod content_hash;
pub mod embedding_vector;

pub use content_hash::ContentHash;
pub use embedding_vector::EmbeddingVector;
