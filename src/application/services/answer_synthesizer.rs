use std::sync::Arc;

use crate::application::ports::LanguageModel;
use crate::application::ports::language_model::{GenerationError, GenerationRequest};
use crate::domain::entities::{Answer, AnswerKind, RetrievedChunk, SourceSnippet};

pub const NO_RELEVANT_INFORMATION: &str =
    "I couldn't find any relevant information in the documents to answer your question.";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on the provided document context.
Your answers should:
1. Be directly based on the context information
2. Include references to document and page numbers where appropriate
3. Say \"I don't know\" when the context doesn't contain the answer

Respond to the user's question based ONLY on the provided context.";

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("Answer generation failed: {0}")]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisConfig {
    pub max_context_chars: usize,
    pub source_preview_chars: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_context_chars: 12_000,
            source_preview_chars: 200,
            temperature: 0.2,
            max_tokens: 1000,
        }
    }
}

pub struct AnswerSynthesizer {
    language_model: Arc<dyn LanguageModel>,
    config: SynthesisConfig,
}

impl AnswerSynthesizer {
    pub fn new(language_model: Arc<dyn LanguageModel>, config: SynthesisConfig) -> Self {
        Self {
            language_model,
            config,
        }
    }

    /// Answers from the retrieved chunks, or returns the fixed fallback
    /// without calling the model when there are none.
    pub async fn answer(
        &self,
        question: &str,
        chunks: &[RetrievedChunk],
    ) -> Result<Answer, SynthesisError> {
        if chunks.is_empty() {
            return Ok(Answer {
                answer: NO_RELEVANT_INFORMATION.to_string(),
                kind: AnswerKind::NoRelevantInformation,
                sources: Vec::new(),
            });
        }

        let context = self.format_context(chunks);
        let request = GenerationRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: format!("Context:\n{context}\n\nQuestion: {question}"),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self.language_model.generate(request).await?;

        tracing::info!(
            model = %response.model,
            chunks = chunks.len(),
            context_chars = context.chars().count(),
            "Generated answer"
        );

        Ok(Answer {
            answer: response.text,
            kind: AnswerKind::Generated,
            sources: self.sources(chunks),
        })
    }

    /// Rank-ordered context entries within `max_context_chars`.
    pub fn format_context(&self, chunks: &[RetrievedChunk]) -> String {
        const ENTRY_SEPARATOR: &str = "\n\n";

        let budget = self.config.max_context_chars;
        let mut context = String::new();
        let mut used = 0;

        for chunk in chunks {
            let entry = format!(
                "[Document {}, Page {}, Chunk {}]\n{}\n",
                chunk.document_id, chunk.page_number, chunk.chunk_index, chunk.text
            );
            let entry_len = entry.chars().count();

            if context.is_empty() {
                if entry_len > budget {
                    context.extend(entry.chars().take(budget));
                    break;
                }
                context.push_str(&entry);
                used = entry_len;
                continue;
            }

            let needed = ENTRY_SEPARATOR.len() + entry_len;
            if used + needed > budget {
                break;
            }
            context.push_str(ENTRY_SEPARATOR);
            context.push_str(&entry);
            used += needed;
        }

        context
    }

    fn sources(&self, chunks: &[RetrievedChunk]) -> Vec<SourceSnippet> {
        chunks
            .iter()
            .map(|chunk| SourceSnippet {
                document_id: chunk.document_id,
                page_number: chunk.page_number,
                chunk_index: chunk.chunk_index,
                text_snippet: preview(&chunk.text, self.config.source_preview_chars),
            })
            .collect()
    }
}

fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut snippet: String = text.chars().take(limit).collect();
    snippet.push_str("...");
    snippet
}
