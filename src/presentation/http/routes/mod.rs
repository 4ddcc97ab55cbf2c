pub mod answer_routes;
pub mod document_routes;
pub mod health_routes;
pub mod ingest_routes;
pub mod search_routes;

pub use answer_routes::*;
pub use document_routes::*;
pub use health_routes::*;
pub use ingest_routes::*;
pub use search_routes::*;
