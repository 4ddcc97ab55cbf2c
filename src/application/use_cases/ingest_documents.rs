use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use crate::application::services::DocumentProcessorService;
use crate::application::services::document_processor::DocumentProcessingError;

#[derive(Debug, thiserror::Error)]
pub enum IngestDocumentsError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// `outcomes` covers every document in upload order; those reported as
    /// ingested stay stored.
    #[error("Ingestion aborted: {source}")]
    Fatal {
        #[source]
        source: DocumentProcessingError,
        outcomes: Vec<IngestionOutcome>,
    },
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct IngestDocumentsRequest {
    pub documents: Vec<UploadedDocument>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestionOutcome {
    Ingested {
        filename: String,
        document_id: Uuid,
        total_pages: i32,
        total_chunks: usize,
    },
    Failed {
        filename: String,
        error: String,
    },
}

impl IngestionOutcome {
    pub fn is_ingested(&self) -> bool {
        matches!(self, IngestionOutcome::Ingested { .. })
    }
}

#[derive(Debug, Clone)]
pub struct IngestDocumentsResponse {
    /// One entry per uploaded document, in upload order.
    pub outcomes: Vec<IngestionOutcome>,
}

pub struct IngestDocumentsUseCase {
    document_processor: Arc<DocumentProcessorService>,
    min_documents: usize,
}

impl IngestDocumentsUseCase {
    pub fn new(document_processor: Arc<DocumentProcessorService>, min_documents: usize) -> Self {
        Self {
            document_processor,
            min_documents,
        }
    }

    pub async fn execute(
        &self,
        request: IngestDocumentsRequest,
    ) -> Result<IngestDocumentsResponse, IngestDocumentsError> {
        if request.documents.len() < self.min_documents {
            return Err(IngestDocumentsError::ValidationError(format!(
                "At least {} documents are required per upload, got {}",
                self.min_documents,
                request.documents.len()
            )));
        }

        if let Some(rejected) = request
            .documents
            .iter()
            .find(|doc| !self.document_processor.accepts(&doc.filename))
        {
            return Err(IngestDocumentsError::ValidationError(format!(
                "Unsupported file type: {}",
                rejected.filename
            )));
        }

        tracing::info!(documents = request.documents.len(), "Ingesting upload");

        let results = join_all(
            request
                .documents
                .iter()
                .map(|doc| self.document_processor.process(&doc.filename, &doc.data)),
        )
        .await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut fatal = None;
        for (doc, result) in request.documents.iter().zip(results) {
            match result {
                Ok(processed) => outcomes.push(IngestionOutcome::Ingested {
                    filename: doc.filename.clone(),
                    document_id: processed.document.id(),
                    total_pages: processed.document.total_pages(),
                    total_chunks: processed.total_chunks,
                }),
                Err(e) => {
                    if e.is_fatal() {
                        tracing::error!(filename = %doc.filename, error = %e, "Fatal document error");
                    } else {
                        tracing::warn!(filename = %doc.filename, error = %e, "Document failed");
                    }
                    outcomes.push(IngestionOutcome::Failed {
                        filename: doc.filename.clone(),
                        error: e.to_string(),
                    });
                    if e.is_fatal() && fatal.is_none() {
                        fatal = Some(e);
                    }
                }
            }
        }

        match fatal {
            Some(source) => {
                let stored = outcomes.iter().filter(|o| o.is_ingested()).count();
                tracing::error!(stored, "Aborting ingestion");
                Err(IngestDocumentsError::Fatal { source, outcomes })
            }
            None => Ok(IngestDocumentsResponse { outcomes }),
        }
    }
}
