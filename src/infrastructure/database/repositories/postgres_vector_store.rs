use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use pgvector::{Vector, VectorExpressionMethods};
use uuid::Uuid;

use crate::domain::entities::{Document, DocumentChunk};
use crate::domain::repositories::vector_store::{validate_chunk, validate_document_chunks};
use crate::domain::repositories::{ScoredChunk, VectorStore, VectorStoreError};
use crate::domain::value_objects::EmbeddingVector;
use crate::infrastructure::database::models::{
    ChunkModel, DocumentModel, NewChunkModel, NewDocumentModel,
};
use crate::infrastructure::database::schema::{document_chunks, documents};
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

/// Postgres bind parameters are capped at 65535 per statement.
const INSERT_BATCH_SIZE: usize = 1000;

/// pgvector-backed store. Every call checks a connection out of the pool on a
/// blocking thread and returns it when the closure finishes.
pub struct PostgresVectorStore {
    pool: DbPool,
    dimension: usize,
}

impl PostgresVectorStore {
    pub fn new(pool: DbPool, dimension: usize) -> Self {
        Self { pool, dimension }
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T, VectorStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, VectorStoreError> + Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection_from_pool(&pool)
                .map_err(|e| VectorStoreError::Unavailable(e.to_string()))?;
            op(&mut conn)
        })
        .await
        .map_err(|e| VectorStoreError::DatabaseError(format!("Task join error: {}", e)))?
    }
}

fn map_diesel_error(error: DieselError) -> VectorStoreError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            VectorStoreError::Unavailable(info.message().to_string())
        }
        other => VectorStoreError::DatabaseError(other.to_string()),
    }
}

fn to_pg_vector(embedding: &EmbeddingVector) -> Vector {
    Vector::from(embedding.as_slice().to_vec())
}

#[async_trait]
impl VectorStore for PostgresVectorStore {
    async fn store_document(
        &self,
        document: &Document,
        chunks: &[DocumentChunk],
    ) -> Result<(), VectorStoreError> {
        validate_document_chunks(document, chunks, self.dimension)?;

        let new_document = NewDocumentModel::from(document);
        let new_chunks: Vec<NewChunkModel> = chunks.iter().map(NewChunkModel::from).collect();

        self.with_connection(move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                diesel::insert_into(documents::table)
                    .values(&new_document)
                    .execute(conn)?;

                for batch in new_chunks.chunks(INSERT_BATCH_SIZE) {
                    diesel::insert_into(document_chunks::table)
                        .values(batch)
                        .execute(conn)?;
                }
                Ok(())
            })
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn insert(
        &self,
        document_id: Uuid,
        chunk: &DocumentChunk,
    ) -> Result<(), VectorStoreError> {
        if !chunk.belongs_to_document(document_id) {
            return Err(VectorStoreError::InvalidChunk(format!(
                "Chunk {} belongs to document {}, not {}",
                chunk.id(),
                chunk.document_id(),
                document_id
            )));
        }
        validate_chunk(chunk, self.dimension)?;

        let page_number = chunk.page_number();
        let chunk_index = chunk.chunk_index();
        let new_chunk = NewChunkModel::from(chunk);

        let inserted = self
            .with_connection(move |conn| {
                conn.transaction::<_, DieselError, _>(|conn| {
                    let parent_exists = diesel::select(diesel::dsl::exists(
                        documents::table.find(document_id),
                    ))
                    .get_result::<bool>(conn)?;
                    if !parent_exists {
                        return Ok(false);
                    }

                    diesel::insert_into(document_chunks::table)
                        .values(&new_chunk)
                        .execute(conn)?;
                    Ok(true)
                })
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        VectorStoreError::DuplicateChunk {
                            document_id,
                            page_number,
                            chunk_index,
                        }
                    }
                    other => map_diesel_error(other),
                })
            })
            .await?;

        if inserted {
            Ok(())
        } else {
            Err(VectorStoreError::DocumentNotFound(document_id))
        }
    }

    async fn search(
        &self,
        query: &EmbeddingVector,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        if !query.has_dimension(self.dimension) {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.dimension(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = to_pg_vector(query);
        let limit = k as i64;

        let rows = self
            .with_connection(move |conn| {
                document_chunks::table
                    .inner_join(documents::table)
                    .select((
                        ChunkModel::as_select(),
                        document_chunks::embedding.cosine_distance(query_vector.clone()),
                    ))
                    .order((
                        document_chunks::embedding.cosine_distance(query_vector),
                        document_chunks::seq.asc(),
                    ))
                    .limit(limit)
                    .load::<(ChunkModel, f64)>(conn)
                    .map_err(map_diesel_error)
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, distance)| ScoredChunk {
                chunk: DocumentChunk::from(model),
                distance,
            })
            .collect())
    }

    async fn delete_document(&self, document_id: Uuid) -> Result<bool, VectorStoreError> {
        self.with_connection(move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                diesel::delete(
                    document_chunks::table.filter(document_chunks::document_id.eq(document_id)),
                )
                .execute(conn)?;
                let deleted = diesel::delete(documents::table.find(document_id)).execute(conn)?;
                Ok(deleted > 0)
            })
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_document(&self, document_id: Uuid) -> Result<Option<Document>, VectorStoreError> {
        let model = self
            .with_connection(move |conn| {
                documents::table
                    .find(document_id)
                    .select(DocumentModel::as_select())
                    .first::<DocumentModel>(conn)
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await?;

        model
            .map(Document::try_from)
            .transpose()
            .map_err(VectorStoreError::DatabaseError)
    }

    async fn list_documents(&self, skip: i64, limit: i64) -> Result<Vec<Document>, VectorStoreError> {
        let models = self
            .with_connection(move |conn| {
                documents::table
                    .select(DocumentModel::as_select())
                    .order((documents::created_at.desc(), documents::id.asc()))
                    .offset(skip)
                    .limit(limit)
                    .load::<DocumentModel>(conn)
                    .map_err(map_diesel_error)
            })
            .await?;

        models
            .into_iter()
            .map(|model| Document::try_from(model).map_err(VectorStoreError::DatabaseError))
            .collect()
    }

    async fn count_documents(&self) -> Result<i64, VectorStoreError> {
        self.with_connection(|conn| {
            documents::table
                .count()
                .get_result::<i64>(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, VectorStoreError> {
        self.with_connection(move |conn| {
            document_chunks::table
                .filter(document_chunks::document_id.eq(document_id))
                .count()
                .get_result::<i64>(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        self.with_connection(|conn| {
            diesel::sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }
}
