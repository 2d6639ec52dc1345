//! LLM provider implementations
//!
//! Maps the `llm` configuration section to a concrete client.

use std::sync::Arc;

use crate::config::{LlmConfig, LlmProvider};
use crate::errors::AssistantError;
use crate::llm::{HttpLLMClient, LLM};

pub mod gemini;

/// Create an LLM client based on the provider configuration
pub fn create_llm_client(config: &LlmConfig) -> Result<Arc<dyn LLM>, AssistantError> {
    validate_provider_config(config)?;
    match &config.provider {
        LlmProvider::Gemini => gemini::create_client(config),
        LlmProvider::Custom { base_url } => {
            log::info!("Using custom chat completions endpoint at {}", base_url);
            Ok(Arc::new(HttpLLMClient::new(
                base_url.clone(),
                config.model_name(),
                config.parameters.temperature,
            )))
        }
    }
}

/// Validate provider-specific configuration
pub fn validate_provider_config(config: &LlmConfig) -> Result<(), AssistantError> {
    match &config.provider {
        LlmProvider::Gemini => {
            if config.auth.api_key.is_none() && config.auth.api_key_env.is_empty() {
                return Err(AssistantError::ConfigError(
                    "Gemini provider requires either 'api_key' or 'api_key_env'".to_string(),
                ));
            }
        }
        LlmProvider::Custom { base_url } => {
            if base_url.is_empty() {
                return Err(AssistantError::ConfigError(
                    "Custom provider requires a valid 'base_url'".to_string(),
                ));
            }
        }
    }

    Ok(())
}
