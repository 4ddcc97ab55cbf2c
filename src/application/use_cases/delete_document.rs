use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repositories::{VectorStore, VectorStoreError};

#[derive(Debug, thiserror::Error)]
pub enum DeleteDocumentError {
    #[error("Document not found: {0}")]
    NotFound(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] VectorStoreError),
}

pub struct DeleteDocumentUseCase {
    vector_store: Arc<dyn VectorStore>,
}

impl DeleteDocumentUseCase {
    pub fn new(vector_store: Arc<dyn VectorStore>) -> Self {
        Self { vector_store }
    }

    /// Removes the document together with all of its chunks.
    pub async fn execute(&self, document_id: Uuid) -> Result<(), DeleteDocumentError> {
        if !self.vector_store.delete_document(document_id).await? {
            return Err(DeleteDocumentError::NotFound(document_id));
        }

        tracing::info!(%document_id, "Deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::EmbeddingProvider;
    use crate::application::services::EmbeddingService;
    use crate::application::use_cases::get_document::{GetDocumentError, GetDocumentUseCase};
    use crate::infrastructure::memory::InMemoryVectorStore;
    use crate::test_support::{VocabularyEmbedder, seed_document};

    #[tokio::test]
    async fn test_delete_removes_document_and_chunks() {
        let provider = Arc::new(VocabularyEmbedder::new());
        let dimension = provider.embedding_dimension();
        let store = Arc::new(InMemoryVectorStore::new(dimension));
        let service = EmbeddingService::new(provider, 64, dimension);
        let document =
            seed_document(&store, &service, "a.pdf", &["Alpha", "Beta", "Gamma"]).await;

        let get = GetDocumentUseCase::new(store.clone());
        assert_eq!(get.execute(document.id()).await.unwrap().total_chunks, 3);

        let delete = DeleteDocumentUseCase::new(store.clone());
        delete.execute(document.id()).await.unwrap();

        assert_eq!(store.count_chunks(document.id()).await.unwrap(), 0);
        assert_eq!(store.count_documents().await.unwrap(), 0);
        assert!(matches!(
            get.execute(document.id()).await,
            Err(GetDocumentError::NotFound(_))
        ));
        assert!(matches!(
            delete.execute(document.id()).await,
            Err(DeleteDocumentError::NotFound(_))
        ));
    }
}
