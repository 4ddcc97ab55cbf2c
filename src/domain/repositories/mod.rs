pub mod vector_store;

pub use vector_store::{ScoredChunk, VectorStore, VectorStoreError};
