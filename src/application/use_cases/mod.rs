pub mod answer_question;
pub mod delete_document;
pub mod get_document;
pub mod ingest_documents;
pub mod list_documents;
pub mod search_content;

pub use answer_question::AnswerQuestionUseCase;
pub use delete_document::DeleteDocumentUseCase;
pub use get_document::GetDocumentUseCase;
pub use ingest_documents::IngestDocumentsUseCase;
pub use list_documents::ListDocumentsUseCase;
pub use search_content::SearchContentUseCase;
