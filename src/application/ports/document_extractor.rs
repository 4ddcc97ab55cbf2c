use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum DocumentExtractionError {
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Per-page plain text, in page order. Pages that failed to extract hold a
/// placeholder and are listed in `failed_pages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub pages: Vec<String>,
    pub failed_pages: Vec<u32>,
}

impl ExtractedDocument {
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self {
            pages,
            failed_pages: Vec::new(),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, data: &[u8]) -> Result<ExtractedDocument, DocumentExtractionError>;

    /// Cheap check on the upload name, done before any extraction work.
    fn can_extract(&self, file_name: &str) -> bool;
}
