pub mod connection;
pub mod models;
pub mod repositories;
pub mod schema;

pub use connection::{
    DatabaseError, DbConnection, DbPool, create_connection_pool, get_connection_from_pool,
    run_migrations,
};

/// Width of `document_chunks.embedding` as created by the migrations.
pub const EMBEDDING_COLUMN_DIMENSION: usize = 1536;
