use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Answer, AnswerKind, SourceSnippet};

#[derive(Debug, Deserialize)]
pub struct AnswerRequestDto {
    pub question: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponseDto {
    pub answer: String,
    pub kind: AnswerKind,
    pub sources: Vec<SourceDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceDto {
    pub document_id: Uuid,
    pub page_number: i32,
    pub chunk_index: i32,
    pub text_snippet: String,
}

impl From<SourceSnippet> for SourceDto {
    fn from(source: SourceSnippet) -> Self {
        Self {
            document_id: source.document_id,
            page_number: source.page_number,
            chunk_index: source.chunk_index,
            text_snippet: source.text_snippet,
        }
    }
}

impl From<Answer> for AnswerResponseDto {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.answer,
            kind: answer.kind,
            sources: answer.sources.into_iter().map(SourceDto::from).collect(),
        }
    }
}
