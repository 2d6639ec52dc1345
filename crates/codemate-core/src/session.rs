//! In-memory state of one interactive conversation.
//!
//! A `Session` owns the chat history, the active mode and the text extracted
//! from each uploaded file. It is passed explicitly to every operation that
//! reads or mutates it; nothing here is shared between sessions.
//!
//! History grows without bound for the lifetime of the session. Uploaded texts
//! are keyed by filename and never replaced: a second upload with the same
//! name is ignored, even when its bytes differ.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core_types::{Message, Role};
use crate::modes::Mode;

/// Text stored for one uploaded file, or the placeholder that replaced it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedText {
    pub filename: String,
    pub text: String,
    pub extraction_failed: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionStats {
    pub message_count: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub uploaded_files: usize,
    pub failed_extractions: usize,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    messages: Vec<Message>,
    mode: Mode,
    uploaded_texts: Vec<UploadedText>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl Session {
    pub fn new(mode: Mode) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
            mode,
            uploaded_texts: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Stores `text` under `filename` unless that name is already present.
    /// Returns whether anything was inserted.
    pub fn record_extracted_text(&mut self, filename: &str, text: impl Into<String>) -> bool {
        self.record(filename, text.into(), false)
    }

    /// Same as [`Session::record_extracted_text`], marking the entry as a failed extraction.
    pub fn record_extraction_failure(
        &mut self,
        filename: &str,
        placeholder: impl Into<String>,
    ) -> bool {
        self.record(filename, placeholder.into(), true)
    }

    fn record(&mut self, filename: &str, text: String, extraction_failed: bool) -> bool {
        if self.contains_upload(filename) {
            log::debug!("'{}' already ingested in session {}, keeping first copy", filename, self.id);
            return false;
        }
        self.uploaded_texts.push(UploadedText {
            filename: filename.to_string(),
            text,
            extraction_failed,
        });
        true
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::info!("Session {} switching mode: {} -> {}", self.id, self.mode, mode);
        }
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Uploaded texts in insertion order.
    pub fn uploaded_texts(&self) -> &[UploadedText] {
        &self.uploaded_texts
    }

    pub fn uploaded_text(&self, filename: &str) -> Option<&str> {
        self.uploaded_texts
            .iter()
            .find(|entry| entry.filename == filename)
            .map(|entry| entry.text.as_str())
    }

    pub fn contains_upload(&self, filename: &str) -> bool {
        self.uploaded_texts
            .iter()
            .any(|entry| entry.filename == filename)
    }

    pub fn upload_count(&self) -> usize {
        self.uploaded_texts.len()
    }

    pub fn stats(&self) -> SessionStats {
        let count_role = |role: Role| self.messages.iter().filter(|m| m.role == role).count();
        SessionStats {
            message_count: self.messages.len(),
            user_messages: count_role(Role::User),
            assistant_messages: count_role(Role::Assistant),
            uploaded_files: self.uploaded_texts.len(),
            failed_extractions: self
                .uploaded_texts
                .iter()
                .filter(|entry| entry.extraction_failed)
                .count(),
        }
    }
}
