pub mod answer_handler;
pub mod document_handler;
pub mod health_handler;
pub mod ingest_handler;
pub mod search_handler;

pub use answer_handler::AnswerHandler;
pub use document_handler::DocumentHandler;
pub use health_handler::HealthHandler;
pub use ingest_handler::IngestHandler;
pub use search_handler::SearchHandler;
