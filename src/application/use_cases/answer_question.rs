use std::sync::Arc;

use crate::application::services::answer_synthesizer::SynthesisError;
use crate::application::services::retriever::RetrievalError;
use crate::application::services::{AnswerSynthesizer, Retriever};
use crate::domain::entities::Answer;

#[derive(Debug, thiserror::Error)]
pub enum AnswerQuestionError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Retrieval failed: {0}")]
    RetrievalError(RetrievalError),
    #[error(transparent)]
    SynthesisError(#[from] SynthesisError),
}

impl From<RetrievalError> for AnswerQuestionError {
    fn from(error: RetrievalError) -> Self {
        match error {
            RetrievalError::InvalidInput(msg) => AnswerQuestionError::ValidationError(msg),
            other => AnswerQuestionError::RetrievalError(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnswerQuestionRequest {
    pub question: String,
    pub top_k: Option<usize>,
}

pub struct AnswerQuestionUseCase {
    retriever: Arc<Retriever>,
    synthesizer: Arc<AnswerSynthesizer>,
    default_top_k: usize,
}

impl AnswerQuestionUseCase {
    pub fn new(
        retriever: Arc<Retriever>,
        synthesizer: Arc<AnswerSynthesizer>,
        default_top_k: usize,
    ) -> Self {
        Self {
            retriever,
            synthesizer,
            default_top_k,
        }
    }

    pub async fn execute(&self, request: AnswerQuestionRequest) -> Result<Answer, AnswerQuestionError> {
        let top_k = request.top_k.unwrap_or(self.default_top_k);
        let chunks = self.retriever.retrieve(&request.question, top_k).await?;

        Ok(self.synthesizer.answer(request.question.trim(), &chunks).await?)
    }
}
