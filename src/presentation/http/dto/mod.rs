pub mod answer_dto;
pub mod document_dto;
pub mod ingest_dto;
pub mod response_dto;
pub mod search_dto;

pub use answer_dto::*;
pub use document_dto::*;
pub use ingest_dto::*;
pub use response_dto::*;
pub use search_dto::*;
