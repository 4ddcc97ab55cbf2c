use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Document, DocumentChunk};
use crate::domain::repositories::vector_store::{validate_chunk, validate_document_chunks};
use crate::domain::repositories::{ScoredChunk, VectorStore, VectorStoreError};
use crate::domain::value_objects::EmbeddingVector;

#[derive(Debug)]
struct StoredChunk {
    seq: u64,
    chunk: DocumentChunk,
}

#[derive(Debug, Default)]
struct StoreState {
    documents: HashMap<Uuid, Document>,
    /// Kept in insertion order.
    chunks: Vec<StoredChunk>,
    next_seq: u64,
}

impl StoreState {
    fn push(&mut self, chunk: DocumentChunk) {
        self.chunks.push(StoredChunk {
            seq: self.next_seq,
            chunk,
        });
        self.next_seq += 1;
    }
}

/// Vector store held in process memory behind one `RwLock`; every write is a
/// single critical section, so readers never observe half a document.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    state: RwLock<StoreState>,
    dimension: usize,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            dimension,
        }
    }

    /// Total number of stored chunks across all documents.
    pub async fn len(&self) -> usize {
        self.state.read().await.chunks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn store_document(
        &self,
        document: &Document,
        chunks: &[DocumentChunk],
    ) -> Result<(), VectorStoreError> {
        validate_document_chunks(document, chunks, self.dimension)?;

        let mut state = self.state.write().await;
        if state.documents.contains_key(&document.id()) {
            return Err(VectorStoreError::DatabaseError(format!(
                "Document {} already exists",
                document.id()
            )));
        }

        state.documents.insert(document.id(), document.clone());
        for chunk in chunks {
            state.push(chunk.clone());
        }
        Ok(())
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

        let mut state = self.state.write().await;
        if !state.documents.contains_key(&document_id) {
            return Err(VectorStoreError::DocumentNotFound(document_id));
        }
        if state
            .chunks
            .iter()
            .any(|stored| stored.chunk.occupies_same_slot(chunk))
        {
            return Err(VectorStoreError::DuplicateChunk {
                document_id,
                page_number: chunk.page_number(),
                chunk_index: chunk.chunk_index(),
            });
        }

        state.push(chunk.clone());
        Ok(())
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

        let state = self.state.read().await;
        let mut scored: Vec<(f64, u64, &DocumentChunk)> = state
            .chunks
            .iter()
            .map(|stored| {
                (
                    stored.chunk.embedding().cosine_distance(query),
                    stored.seq,
                    &stored.chunk,
                )
            })
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(distance, _, chunk)| ScoredChunk {
                chunk: chunk.clone(),
                distance,
            })
            .collect())
    }

    async fn delete_document(&self, document_id: Uuid) -> Result<bool, VectorStoreError> {
        let mut state = self.state.write().await;
        let existed = state.documents.remove(&document_id).is_some();
        state
            .chunks
            .retain(|stored| !stored.chunk.belongs_to_document(document_id));
        Ok(existed)
    }

    async fn find_document(&self, document_id: Uuid) -> Result<Option<Document>, VectorStoreError> {
        Ok(self.state.read().await.documents.get(&document_id).cloned())
    }

    async fn list_documents(&self, skip: i64, limit: i64) -> Result<Vec<Document>, VectorStoreError> {
        let state = self.state.read().await;
        let mut documents: Vec<&Document> = state.documents.values().collect();
        documents.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(a.id().cmp(&b.id()))
        });

        Ok(documents
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_documents(&self) -> Result<i64, VectorStoreError> {
        Ok(self.state.read().await.documents.len() as i64)
    }

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, VectorStoreError> {
        let state = self.state.read().await;
        Ok(state
            .chunks
            .iter()
            .filter(|stored| stored.chunk.belongs_to_document(document_id))
            .count() as i64)
    }

    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        Ok(true)
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::entities::ChunkDraft;
    use crate::domain::value_objects::ContentHash;

    const DIMENSION: usize = 3;

    fn document(name: &str) -> Document {
        Document::new(name.to_string(), 1, ContentHash::from_bytes(name.as_bytes()))
    }

    fn chunk(document: &Document, chunk_index: i32, values: [f32; 3]) -> DocumentChunk {
        DocumentChunk::new(
            document.id(),
            ChunkDraft {
                text: format!("chunk {chunk_index}"),
                page_number: 1,
                chunk_index,
            },
            EmbeddingVector::new(values.to_vec()),
        )
    }

    #[tokio::test]
    async fn test_search_orders_by_distance_then_insertion() {
        let store = InMemoryVectorStore::new(DIMENSION);
        let doc = document("a.pdf");
        let chunks = vec![
            chunk(&doc, 0, [0.0, 1.0, 0.0]),
            chunk(&doc, 1, [1.0, 0.0, 0.0]),
            chunk(&doc, 2, [2.0, 0.0, 0.0]),
        ];
        store.store_document(&doc, &chunks).await.unwrap();

        let hits = store
            .search(&EmbeddingVector::new(vec![1.0, 0.0, 0.0]), 5)
            .await
            .unwrap();

        let indices: Vec<i32> = hits.iter().map(|hit| hit.chunk.chunk_index()).collect();
        assert_eq!(indices, vec![1, 2, 0]);
        assert!(hits[0].distance.abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_store_and_zero_k() {
        let store = InMemoryVectorStore::new(DIMENSION);
        let query = EmbeddingVector::new(vec![1.0, 0.0, 0.0]);

        assert!(store.search(&query, 5).await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_chunks() {
        let store = InMemoryVectorStore::new(DIMENSION);
        let doc = document("a.pdf");
        store
            .store_document(&doc, &[chunk(&doc, 0, [1.0, 0.0, 0.0])])
            .await
            .unwrap();

        let duplicate = chunk(&doc, 0, [0.0, 1.0, 0.0]);
        assert!(matches!(
            store.insert(doc.id(), &duplicate).await,
            Err(VectorStoreError::DuplicateChunk { chunk_index: 0, .. })
        ));

        let orphan_doc = document("missing.pdf");
        let orphan = chunk(&orphan_doc, 0, [0.0, 1.0, 0.0]);
        assert!(matches!(
            store.insert(orphan_doc.id(), &orphan).await,
            Err(VectorStoreError::DocumentNotFound(_))
        ));

        let wrong_dimension = DocumentChunk::new(
            doc.id(),
            ChunkDraft {
                text: "short".to_string(),
                page_number: 1,
                chunk_index: 1,
            },
            EmbeddingVector::new(vec![1.0, 0.0]),
        );
        assert!(matches!(
            store.insert(doc.id(), &wrong_dimension).await,
            Err(VectorStoreError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));

        store
            .insert(doc.id(), &chunk(&doc, 1, [0.0, 0.0, 1.0]))
            .await
            .unwrap();
        assert_eq!(store.count_chunks(doc.id()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_store_document_is_all_or_nothing() {
        let store = InMemoryVectorStore::new(DIMENSION);
        let doc = document("a.pdf");
        let template = chunk(&doc, 1, [1.0, 0.0, 0.0]);
        let bad = DocumentChunk::restore(
            template.id(),
            template.document_id(),
            template.text().to_string(),
            template.page_number(),
            template.chunk_index(),
            EmbeddingVector::new(vec![1.0; 4]),
            template.created_at(),
        );

        let result = store
            .store_document(&doc, &[chunk(&doc, 0, [1.0, 0.0, 0.0]), bad])
            .await;

        assert!(matches!(result, Err(VectorStoreError::DimensionMismatch { .. })));
        assert_eq!(store.count_documents().await.unwrap(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_removes_document_and_chunks() {
        let store = InMemoryVectorStore::new(DIMENSION);
        let keep = document("keep.pdf");
        let drop = document("drop.pdf");
        store
            .store_document(&keep, &[chunk(&keep, 0, [1.0, 0.0, 0.0])])
            .await
            .unwrap();
        store
            .store_document(
                &drop,
                &[chunk(&drop, 0, [0.0, 1.0, 0.0]), chunk(&drop, 1, [0.0, 0.0, 1.0])],
            )
            .await
            .unwrap();

        assert!(store.delete_document(drop.id()).await.unwrap());
        assert!(!store.delete_document(drop.id()).await.unwrap());

        assert_eq!(store.count_chunks(drop.id()).await.unwrap(), 0);
        assert_eq!(store.count_documents().await.unwrap(), 1);
        let hits = store
            .search(&EmbeddingVector::new(vec![0.0, 1.0, 0.0]), 10)
            .await
            .unwrap();
        assert!(hits.iter().all(|hit| hit.chunk.document_id() == keep.id()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_search_never_sees_a_partial_document() {
        let store = Arc::new(InMemoryVectorStore::new(DIMENSION));
        let mut victims = Vec::new();
        for n in 0..20 {
            let doc = document(&format!("doc-{n}.pdf"));
            let chunks: Vec<DocumentChunk> = (0..3)
                .map(|i| chunk(&doc, i, [1.0, i as f32, n as f32]))
                .collect();
            store.store_document(&doc, &chunks).await.unwrap();
            victims.push(doc.id());
        }

        let deleter = {
            let store = store.clone();
            tokio::spawn(async move {
                for id in victims {
                    store.delete_document(id).await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        let searchers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    for _ in 0..50 {
                        let hits = store
                            .search(&EmbeddingVector::new(vec![1.0, 1.0, 1.0]), 100)
                            .await
                            .unwrap();
                        let mut per_document: HashMap<Uuid, usize> = HashMap::new();
                        for hit in &hits {
                            *per_document.entry(hit.chunk.document_id()).or_default() += 1;
                        }
                        assert!(per_document.values().all(|&count| count == 3));
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        deleter.await.unwrap();
        for searcher in searchers {
            searcher.await.unwrap();
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_documents_pages() {
        let store = InMemoryVectorStore::new(DIMENSION);
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            store.store_document(&document(name), &[]).await.unwrap();
        }

        assert_eq!(store.list_documents(0, 2).await.unwrap().len(), 2);
        assert_eq!(store.list_documents(2, 2).await.unwrap().len(), 1);
        assert_eq!(store.count_documents().await.unwrap(), 3);
    }
}
