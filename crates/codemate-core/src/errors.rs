//! Error types for the assistant pipeline
//!
//! `AssistantError` covers every failure that can reach a caller of the
//! library: provider calls, upload ingestion, configuration and validation.
//! Extraction failures are normally recovered into a placeholder string by
//! the session ingestion path, so they only surface from the extractor itself.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistantError {
    #[error("LLM interaction failed: {0}")]
    LLMError(String),
    #[error("Parsing error: {0}")]
    ParsingError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("{0}")]
    ExtractionError(String),
    #[error("Unsupported file type for '{filename}'. Accepted extensions: {accepted}")]
    UnsupportedUpload { filename: String, accepted: String },
    #[error("No uploaded files to analyze")]
    NothingToAnalyze,
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<std::io::Error> for AssistantError {
    fn from(err: std::io::Error) -> Self {
        AssistantError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::LLMError(err.to_string())
    }
}

// Specific error for the snippet runner
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to start '{interpreter}': {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error during code execution: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Script execution timed out after {0} seconds")]
    Timeout(u64),
}
