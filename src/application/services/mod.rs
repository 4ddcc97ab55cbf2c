pub mod answer_synthesizer;
pub mod document_processor;
pub mod embedding_service;
pub mod retriever;
pub mod text_chunker;

pub use answer_synthesizer::{AnswerSynthesizer, SynthesisConfig};
pub use document_processor::DocumentProcessorService;
pub use embedding_service::EmbeddingService;
pub use retriever::Retriever;
pub use text_chunker::{ChunkingConfig, RTSplitter};
