//! Core library for a mode-driven coding assistant.
//!
//! A conversation is a [`Session`]: chat history, the active [`Mode`] and the
//! text extracted from uploaded files. Every request sent to the model is the
//! mode's instruction followed by the history, assembled fresh each time.
//!
//! - **Modes**: fixed instruction per assistant persona, overridable from config
//! - **Extraction**: plain text, DOCX and PDF uploads turned into text, with a
//!   placeholder when a file cannot be read
//! - **Chat**: one provider request per user turn, Gemini or a custom endpoint
//! - **Analysis**: all uploaded files reviewed in a single request
//! - **Execution**: optional local run of a snippet with a timeout

pub mod analysis;
pub mod assistant;
pub mod chat;
pub mod config;
pub mod core_types;
pub mod errors;
pub mod executors;
pub mod extract;
pub mod llm;
pub mod modes;
pub mod prompt;
pub mod session;

pub use assistant::{Assistant, UploadOutcome};
pub use chat::ChatClient;
pub use config::*;
pub use core_types::{Message, Reply, Role};
pub use errors::AssistantError;
pub use executors::CodeExecutor;
pub use extract::{TextExtractor, Upload};
pub use llm::LLM;
pub use modes::{Mode, ModeRegistry};
pub use session::Session;

#[cfg(test)]
pub mod test_utils;
