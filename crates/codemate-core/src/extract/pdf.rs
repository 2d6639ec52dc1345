//! Page-based PDF text loader backed by `lopdf`.

use std::path::Path;

use lopdf::Document;

use super::DocumentLoader;
use crate::errors::AssistantError;

pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<String>, AssistantError> {
        let document = Document::load(path)
            .map_err(|e| AssistantError::ExtractionError(format!("invalid PDF: {}", e)))?;

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        log::debug!("PDF {} has {} page(s)", path.display(), page_numbers.len());

        page_numbers
            .into_iter()
            .map(|page| {
                document
                    .extract_text(&[page])
                    // lopdf ends every text object with a newline.
                    .map(|text| text.trim_end_matches('\n').to_string())
                    .map_err(|e| {
                        AssistantError::ExtractionError(format!(
                            "failed to read page {}: {}",
                            page, e
                        ))
                    })
            })
            .collect()
    }
}
