pub mod answer;
pub mod document;
pub mod document_chunk;
pub mod retrieved_chunk;

pub use answer::{Answer, AnswerKind, SourceSnippet};
pub use document::Document;
pub use document_chunk::{ChunkDraft, DocumentChunk};
pub use retrieved_chunk::RetrievedChunk;
