use async_trait::async_trait;
use lopdf::Document;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedDocument,
};

pub struct PdfExtractor {
    password: String,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            password: String::new(),
        }
    }

    fn placeholder(page_num: u32) -> String {
        format!("[Failed to extract text from page {}]", page_num)
    }

    fn extract_pages(data: &[u8], password: &str) -> Result<ExtractedDocument, DocumentExtractionError> {
        let mut doc = Document::load_mem(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(password).map_err(|_e| {
                DocumentExtractionError::ExtractionFailed(
                    "Failed to decrypt PDF - invalid password".to_string(),
                )
            })?;
        }

        let pages = doc.get_pages();
        let mut extracted_pages: Vec<(u32, Result<String, String>)> = pages
            .into_par_iter()
            .map(|(page_num, _): (u32, (u32, u16))| {
                let text = doc
                    .extract_text(&[page_num])
                    .map_err(|e| format!("Failed to extract text from page {}: {}", page_num, e));
                (page_num, text)
            })
            .collect();
        extracted_pages.sort_by_key(|(page_num, _)| *page_num);

        let mut extracted = ExtractedDocument::default();
        for (page_num, result) in extracted_pages {
            match result {
                Ok(text) if text.trim().is_empty() => extracted.pages.push(String::new()),
                Ok(text) => extracted.pages.push(text),
                Err(e) => {
                    tracing::warn!(page = page_num, error = %e, "Page extraction failed");
                    extracted.pages.push(Self::placeholder(page_num));
                    extracted.failed_pages.push(page_num);
                }
            }
        }

        Ok(extracted)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, data: &[u8]) -> Result<ExtractedDocument, DocumentExtractionError> {
        let data = data.to_vec();
        let password = self.password.clone();

        tokio::task::spawn_blocking(move || Self::extract_pages(&data, &password))
            .await
            .map_err(|e| DocumentExtractionError::ExtractionFailed(format!("Task join error: {}", e)))?
    }

    fn can_extract(&self, file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(".pdf")
    }
}
