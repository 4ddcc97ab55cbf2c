use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::search_content::SearchContentResponse;
use crate::domain::entities::RetrievedChunk;

#[derive(Debug, Deserialize)]
pub struct SearchRequestDto {
    pub query: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponseDto {
    pub query: String,
    pub results: Vec<SearchResultDto>,
    pub total_results: usize,
    pub search_time_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResultDto {
    pub document_id: Uuid,
    pub page_number: i32,
    pub chunk_index: i32,
    pub text: String,
    pub distance: f64,
}

impl From<SearchContentResponse> for SearchResponseDto {
    fn from(response: SearchContentResponse) -> Self {
        Self {
            query: response.query,
            total_results: response.results.len(),
            results: response
                .results
                .into_iter()
                .map(SearchResultDto::from)
                .collect(),
            search_time_ms: response.search_time_ms,
        }
    }
}

impl From<RetrievedChunk> for SearchResultDto {
    fn from(chunk: RetrievedChunk) -> Self {
        Self {
            document_id: chunk.document_id,
            page_number: chunk.page_number,
            chunk_index: chunk.chunk_index,
            text: chunk.text,
            distance: chunk.distance,
        }
    }
}
