pub mod postgres_vector_store;

pub use postgres_vector_store::PostgresVectorStore;
