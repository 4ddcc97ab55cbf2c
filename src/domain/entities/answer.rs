use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// The language model answered from retrieved context.
    Generated,
    /// Nothing was retrieved; the model was not called.
    NoRelevantInformation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSnippet {
    pub document_id: Uuid,
    pub page_number: i32,
    pub chunk_index: i32,
    pub text_snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub kind: AnswerKind,
    pub sources: Vec<SourceSnippet>,
}

impl Answer {
    pub fn is_fallback(&self) -> bool {
        self.kind == AnswerKind::NoRelevantInformation
    }
}
