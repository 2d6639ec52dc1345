//! One round trip to the model for a given mode and history.

use std::sync::Arc;

use crate::core_types::Message;
use crate::errors::AssistantError;
use crate::llm::LLM;
use crate::modes::{Mode, ModeRegistry};
use crate::prompt::build_prompt;

#[derive(Clone)]
pub struct ChatClient {
    llm: Arc<dyn LLM>,
    registry: Arc<ModeRegistry>,
}

impl ChatClient {
    pub fn new(llm: Arc<dyn LLM>, registry: Arc<ModeRegistry>) -> Self {
        Self { llm, registry }
    }

    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    /// Assembles the prompt for `mode` and issues exactly one request.
    ///
    /// A response without text is treated as malformed.
    pub async fn send(&self, mode: Mode, history: &[Message]) -> Result<String, AssistantError> {
        let prompt = build_prompt(&self.registry, mode, history);
        log::debug!("Sending {} message(s) in {} mode", prompt.len(), mode);

        let response = self.llm.generate(prompt).await.map_err(|e| {
            log::error!("Model request failed: {}", e);
            e
        })?;

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => {
                let err = AssistantError::ParsingError(format!(
                    "model returned an empty reply (finish reason: {})",
                    response.finish_reason.as_deref().unwrap_or("unknown")
                ));
                log::error!("{}", err);
                Err(err)
            }
        }
    }
}
