//! Upload-to-text extraction.
//!
//! Every upload is spilled to a named temporary file carrying the original
//! extension, then dispatched by that extension: `.docx` and `.pdf` go through
//! a [`DocumentLoader`], everything else is read as permissively decoded text.
//! The temporary file is owned by a `NamedTempFile` and is removed when it
//! drops, on success and on every error path.

use std::io::Write;
use std::path::Path;

use crate::errors::AssistantError;

pub mod docx;
pub mod pdf;

pub use docx::DocxLoader;
pub use pdf::PdfLoader;

/// Extensions accepted by the upload surface (lower-case, no dot).
pub const SUPPORTED_EXTENSIONS: [&str; 17] = [
    "py", "js", "ts", "java", "cpp", "c", "html", "css", "json", "go", "rb", "php", "cs", "txt",
    "md", "docx", "pdf",
];

/// A file handed to the assistant: its display name and raw bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, naming the upload after the file name component.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AssistantError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AssistantError::ValidationError(format!("'{}' is not a file path", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AssistantError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self { name, bytes })
    }

    /// Lower-cased extension without the dot; empty when the name has none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    pub fn is_supported(&self) -> bool {
        let extension = self.extension();
        SUPPORTED_EXTENSIONS.contains(&extension.as_str())
    }

    /// Rejects uploads whose extension is not on the allow-list.
    pub fn ensure_supported(&self) -> Result<(), AssistantError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(AssistantError::UnsupportedUpload {
                filename: self.name.clone(),
                accepted: SUPPORTED_EXTENSIONS.join(", "),
            })
        }
    }
}

/// Turns a structured document on disk into text blocks (paragraphs, pages).
pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<String>, AssistantError>;
}

/// Result of ingesting one upload: the stored text and whether it is a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub failed: bool,
}

pub struct TextExtractor {
    docx_loader: Box<dyn DocumentLoader>,
    pdf_loader: Box<dyn DocumentLoader>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(Box::new(DocxLoader), Box::new(PdfLoader))
    }
}

impl TextExtractor {
    pub fn new(docx_loader: Box<dyn DocumentLoader>, pdf_loader: Box<dyn DocumentLoader>) -> Self {
        Self {
            docx_loader,
            pdf_loader,
        }
    }

    pub fn extract(&self, upload: &Upload) -> Result<String, AssistantError> {
        let extension = upload.extension();
        let suffix = if extension.is_empty() {
            String::new()
        } else {
            format!(".{}", extension)
        };

        let mut spill = tempfile::Builder::new()
            .prefix("codemate-upload-")
            .suffix(&suffix)
            .tempfile()?;
        spill.write_all(&upload.bytes)?;
        spill.flush()?;

        let text = match extension.as_str() {
            "docx" => self.docx_loader.load(spill.path())?.join("\n"),
            "pdf" => self.pdf_loader.load(spill.path())?.join("\n"),
            _ => read_permissive(spill.path())?,
        };

        log::debug!(
            "Extracted {} characters from '{}'",
            text.chars().count(),
            upload.name
        );
        Ok(text)
    }

    /// Extraction that never fails: errors become a readable placeholder.
    pub fn extract_or_placeholder(&self, upload: &Upload) -> Extraction {
        match self.extract(upload) {
            Ok(text) => Extraction {
                text,
                failed: false,
            },
            Err(e) => {
                log::warn!("Could not extract text from '{}': {}", upload.name, e);
                Extraction {
                    text: placeholder(&upload.name, &e),
                    failed: true,
                }
            }
        }
    }
}

pub fn placeholder(filename: &str, error: &AssistantError) -> String {
    format!("Could not read {}: {}", filename, error)
}

/// Reads a file as UTF-8, silently dropping invalid byte sequences.
fn read_permissive(path: &Path) -> Result<String, AssistantError> {
    let bytes = std::fs::read(path)?;
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::path::PathBuf;

    struct RecordingLoader {
        seen: Arc<Mutex<Vec<PathBuf>>>,
        outcome: Result<Vec<String>, AssistantError>,
    }

    impl DocumentLoader for RecordingLoader {
        fn load(&self, path: &Path) -> Result<Vec<String>, AssistantError> {
            assert!(path.exists(), "loader should see the spilled file");
            self.seen.lock().unwrap().push(path.to_path_buf());
            self.outcome.clone()
        }
    }

    fn extractor_with_pdf(
        outcome: Result<Vec<String>, AssistantError>,
    ) -> (TextExtractor, Arc<Mutex<Vec<PathBuf>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pdf = RecordingLoader {
            seen: seen.clone(),
            outcome,
        };
        (TextExtractor::new(Box::new(DocxLoader), Box::new(pdf)), seen)
    }

    #[test]
    fn plain_text_is_returned_as_is() {
        let extractor = TextExtractor::default();
        let upload = Upload::new("main.py", "print('hi')\n");
        assert_eq!(extractor.extract(&upload).unwrap(), "print('hi')\n");
    }

    #[test]
    fn invalid_utf8_is_dropped_not_fatal() {
        let extractor = TextExtractor::default();
        let upload = Upload::new("notes.txt", vec![b'a', 0xff, 0xfe, b'b', 0xc3, b'c']);
        assert_eq!(extractor.extract(&upload).unwrap(), "abc");
    }

    #[test]
    fn pdf_pages_are_joined_with_newlines_and_spill_is_removed() {
        let (extractor, seen) =
            extractor_with_pdf(Ok(vec!["page one".to_string(), "page two".to_string()]));
        let upload = Upload::new("Report.PDF", b"%PDF-1.4".to_vec());

        assert_eq!(extractor.extract(&upload).unwrap(), "page one\npage two");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].to_string_lossy().ends_with(".pdf"));
        assert!(!seen[0].exists());
    }

    #[test]
    fn loader_failure_still_removes_spill() {
        let (extractor, seen) = extractor_with_pdf(Err(AssistantError::ExtractionError(
            "broken trailer".to_string(),
        )));
        let upload = Upload::new("a.pdf", b"garbage".to_vec());

        let err = extractor.extract(&upload).unwrap_err();
        assert_eq!(err.to_string(), "broken trailer");
        assert!(!seen.lock().unwrap()[0].exists());
    }

    #[test]
    fn corrupted_pdf_becomes_placeholder() {
        let extractor = TextExtractor::default();
        let upload = Upload::new("a.pdf", b"this is not a pdf".to_vec());

        let extraction = extractor.extract_or_placeholder(&upload);
        assert!(extraction.failed);
        assert!(extraction.text.starts_with("Could not read a.pdf: "));
        assert!(extraction.text.len() > "Could not read a.pdf: ".len());
    }

    #[test]
    fn extension_allow_list() {
        assert!(Upload::new("App.Java", "").is_supported());
        assert!(Upload::new("README.md", "").is_supported());
        assert!(!Upload::new("binary.exe", "").is_supported());
        assert!(!Upload::new("Makefile", "").is_supported());

        let err = Upload::new("photo.png", "").ensure_supported().unwrap_err();
        assert!(matches!(err, AssistantError::UnsupportedUpload { ref filename, .. } if filename == "photo.png"));
    }

    #[tokio::test]
    async fn upload_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.rs.txt");
        std::fs::write(&path, "fn main() {}").unwrap();

        let upload = Upload::from_path(&path).await.unwrap();
        assert_eq!(upload.name, "lib.rs.txt");
        assert_eq!(upload.extension(), "txt");
        assert_eq!(upload.bytes, b"fn main() {}");
    }
}
