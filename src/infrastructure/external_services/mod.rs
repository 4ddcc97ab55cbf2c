pub mod document_extractors;
pub mod inference_client;
pub mod openai_chat_client;
pub mod openai_embedding_provider;

pub use document_extractors::PdfExtractor;
pub use inference_client::{InferenceClient, InferenceClientConfig};
pub use openai_chat_client::OpenAIChatModel;
pub use openai_embedding_provider::OpenAIEmbeddingProvider;
