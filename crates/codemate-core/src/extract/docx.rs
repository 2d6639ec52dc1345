//! DOCX text loader.
//!
//! A `.docx` file is a ZIP container; the body lives in `word/document.xml`.
//! Each `<w:p>` paragraph becomes one block, built from its `<w:t>` runs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::DocumentLoader;
use crate::errors::AssistantError;

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxLoader;

impl DocumentLoader for DocxLoader {
    fn load(&self, path: &Path) -> Result<Vec<String>, AssistantError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| {
            AssistantError::ExtractionError(format!("not a valid DOCX archive: {}", e))
        })?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| {
                AssistantError::ExtractionError(format!("missing {}: {}", DOCUMENT_PART, e))
            })?
            .read_to_string(&mut xml)?;

        paragraphs(&xml)
    }
}

fn paragraphs(xml: &str) -> Result<Vec<String>, AssistantError> {
    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => blocks.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => blocks.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t.unescape().map_err(|e| {
                    AssistantError::ExtractionError(format!("malformed DOCX text: {}", e))
                })?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AssistantError::ExtractionError(format!(
                    "malformed {} at position {}: {}",
                    DOCUMENT_PART,
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }
    Ok(blocks)
}
