// src/test_utils/scripted_llm.rs
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core_types::{LLMResponse, Message};
use crate::errors::AssistantError;
use crate::llm::LLM;

/// In-process `LLM` that replays scripted responses and records every prompt.
pub struct ScriptedLLM {
    responses: Mutex<VecDeque<Result<LLMResponse, AssistantError>>>,
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLLM {
    pub fn new(responses: Vec<Result<LLMResponse, AssistantError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(LLMResponse::text(*t))).collect())
    }

    pub fn prompts(&self) -> Vec<Vec<Message>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    async fn generate(&self, messages: Vec<Message>) -> Result<LLMResponse, AssistantError> {
        self.prompts.lock().unwrap().push(messages);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AssistantError::LLMError("no scripted response left".to_string())))
    }
}
