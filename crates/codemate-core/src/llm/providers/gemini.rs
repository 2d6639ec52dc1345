//! Google Gemini API client implementation
//!
//! Talks to the `generateContent` endpoint of the Generative Language API.
//! System messages become the request's `systemInstruction`; user and
//! assistant turns become `user` and `model` contents.

use crate::config::LlmConfig;
use crate::core_types::{LLMResponse, Message, Role, Usage};
use crate::errors::AssistantError;
use crate::llm::LLM;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    generation_config: GeminiGenerationConfig,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new Gemini client with custom base URL
    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            generation_config: GeminiGenerationConfig::default(),
            client: Client::new(),
            base_url,
        }
    }

    pub fn with_generation_config(
        mut self,
        temperature: f32,
        max_output_tokens: Option<u32>,
        top_p: Option<f32>,
        stop_sequences: Vec<String>,
    ) -> Self {
        self.generation_config = GeminiGenerationConfig {
            temperature,
            max_output_tokens,
            top_p,
            stop_sequences,
        };
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(rename = "stopSequences", skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

impl Default for GeminiGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: None,
            top_p: None,
            stop_sequences: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata", default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: Option<u32>,
    #[serde(rename = "totalTokenCount", default)]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetails,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetails {
    code: u16,
    message: String,
}

impl GeminiClient {
    fn convert_messages_to_gemini_contents(
        &self,
        messages: Vec<Message>,
    ) -> (Option<GeminiContent>, Vec<GeminiContent>) {
        let mut system_instruction = None;
        let mut contents = Vec::new();

        for message in messages {
            let text_part = vec![GeminiPart {
                text: Some(message.content),
            }];
            match message.role {
                Role::System => {
                    // Use the last system message as system instruction
                    system_instruction = Some(GeminiContent {
                        role: None,
                        parts: text_part,
                    });
                }
                Role::User => contents.push(GeminiContent {
                    role: Some("user".to_string()),
                    parts: text_part,
                }),
                Role::Assistant => contents.push(GeminiContent {
                    role: Some("model".to_string()),
                    parts: text_part,
                }),
            }
        }

        (system_instruction, contents)
    }

    fn convert_gemini_response_to_llm(
        &self,
        response: GeminiResponse,
    ) -> Result<LLMResponse, AssistantError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::LLMError("No candidates in Gemini response".to_string()))?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let content = if text.is_empty() { None } else { Some(text) };

        let usage = response.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count.unwrap_or(0),
            completion_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count.unwrap_or(0),
        });

        Ok(LLMResponse {
            content,
            finish_reason: candidate.finish_reason,
            usage,
        })
    }
}

#[async_trait]
impl LLM for GeminiClient {
    async fn generate(&self, messages: Vec<Message>) -> Result<LLMResponse, AssistantError> {
        let (system_instruction, contents) = self.convert_messages_to_gemini_contents(messages);

        let request = GeminiRequest {
            contents,
            generation_config: self.generation_config.clone(),
            system_instruction,
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        log::debug!(
            "Gemini request to model {} with {} content(s)",
            self.model,
            request.contents.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::LLMError(format!("Gemini API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(gemini_error) = serde_json::from_str::<GeminiError>(&error_text) {
                return Err(AssistantError::LLMError(format!(
                    "Gemini API error {}: {}",
                    gemini_error.error.code, gemini_error.error.message
                )));
            }

            return Err(AssistantError::LLMError(format!(
                "Gemini API request failed with status {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            AssistantError::ParsingError(format!("Failed to parse Gemini response: {}", e))
        })?;

        self.convert_gemini_response_to_llm(gemini_response)
    }
}

/// Create a Gemini LLM client from configuration
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LLM>, AssistantError> {
    Ok(Arc::new(build_client(config)?))
}

fn build_client(config: &LlmConfig) -> Result<GeminiClient, AssistantError> {
    let api_key = match &config.auth.api_key {
        Some(key) => key.clone(),
        None => env::var(&config.auth.api_key_env).map_err(|_| {
            AssistantError::ConfigError(format!(
                "No API key found for Gemini. Set the {} environment variable or provide api_key in config",
                config.auth.api_key_env
            ))
        })?,
    };

    let params = &config.parameters;
    let client = GeminiClient::new(api_key, config.model_name()).with_generation_config(
        params.temperature,
        params.max_output_tokens,
        params.top_p,
        params.stop_sequences.clone(),
    );
    log::info!("Gemini client ready for model {}", client.model());
    Ok(client)
}
