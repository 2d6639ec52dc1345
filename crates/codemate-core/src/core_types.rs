//! Core type definitions shared by the session, prompt and provider layers
//!
//! A conversation is an ordered list of role-tagged `Message`s. Messages are
//! never edited after creation; the session only appends to its history.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::AssistantError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

// Usage statistics structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LLMResponse {
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl LLMResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: None,
            usage: None,
        }
    }
}

/// What the user sees in the assistant slot after a round trip.
///
/// A provider failure still produces a reply: its content is the error
/// description and `failure` carries the error itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    pub failure: Option<AssistantError>,
}

impl Reply {
    pub fn success(content: String) -> Self {
        Self {
            content,
            failure: None,
        }
    }

    pub fn failed(error: AssistantError) -> Self {
        Self {
            content: error.to_string(),
            failure: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}
