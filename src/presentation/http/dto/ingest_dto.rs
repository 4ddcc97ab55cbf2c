use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::ingest_documents::{IngestDocumentsResponse, IngestionOutcome};

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponseDto {
    pub documents: Vec<IngestOutcomeDto>,
    pub ingested: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcomeDto {
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

impl From<IngestionOutcome> for IngestOutcomeDto {
    fn from(outcome: IngestionOutcome) -> Self {
        match outcome {
            IngestionOutcome::Ingested {
                filename,
                document_id,
                total_pages,
                total_chunks,
            } => IngestOutcomeDto::Ingested {
                filename,
                document_id,
                total_pages,
                total_chunks,
            },
            IngestionOutcome::Failed { filename, error } => {
                IngestOutcomeDto::Failed { filename, error }
            }
        }
    }
}

impl From<IngestDocumentsResponse> for IngestResponseDto {
    fn from(response: IngestDocumentsResponse) -> Self {
        let ingested = response.outcomes.iter().filter(|o| o.is_ingested()).count();
        let failed = response.outcomes.len() - ingested;

        Self {
            documents: response
                .outcomes
                .into_iter()
                .map(IngestOutcomeDto::from)
                .collect(),
            ingested,
            failed,
        }
    }
}
