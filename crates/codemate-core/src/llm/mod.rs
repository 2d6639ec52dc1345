//! Language model provider abstraction.
//!
//! One `generate` call is one request: an ordered message list in, one
//! response out. Implementations do not retry and do not stream.

pub use crate::core_types::{LLMResponse, Message};
use crate::core_types::Usage;
use crate::errors::AssistantError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod providers;

#[async_trait]
pub trait LLM: Send + Sync {
    async fn generate(&self, messages: Vec<Message>) -> Result<LLMResponse, AssistantError>;
}

use reqwest::Client;

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// The reply is read from `choices[0].message.content`.
pub struct HttpLLMClient {
    pub endpoint_url: String,
    model: String,
    temperature: f32,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_llm_response(self) -> Result<LLMResponse, AssistantError> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            AssistantError::ParsingError("chat completion contained no choices".to_string())
        })?;
        Ok(LLMResponse {
            content: choice.message.content,
            finish_reason: choice.finish_reason,
            usage: self.usage,
        })
    }
}

impl HttpLLMClient {
    pub fn new(endpoint_url: String, model: String, temperature: f32) -> Self {
        Self {
            endpoint_url,
            model,
            temperature,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LLM for HttpLLMClient {
    async fn generate(&self, messages: Vec<Message>) -> Result<LLMResponse, AssistantError> {
        #[derive(Serialize)]
        struct RequestPayload<'a> {
            model: &'a str,
            temperature: f32,
            messages: &'a Vec<Message>,
        }

        let payload = RequestPayload {
            model: &self.model,
            temperature: self.temperature,
            messages: &messages,
        };

        let request_url = format!(
            "{}/v1/chat/completions",
            self.endpoint_url.trim_end_matches('/')
        );
        log::debug!(
            "HttpLLMClient sending {} message(s) to {}",
            payload.messages.len(),
            request_url
        );

        let response = self
            .client
            .post(&request_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let err_msg = format!("HTTP request to LLM endpoint failed: {}", e);
                log::error!("{}", err_msg);
                AssistantError::LLMError(err_msg)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| {
                "Unknown error while reading error response body".to_string()
            });
            let err_msg = format!(
                "LLM API request failed with status {}: {}",
                status, error_text
            );
            log::error!("{}", err_msg);
            return Err(AssistantError::LLMError(err_msg));
        }

        let completion = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            let err_msg = format!("Failed to parse LLM response JSON: {}", e);
            log::error!("{}", err_msg);
            AssistantError::ParsingError(err_msg)
        })?;
        let llm_response = completion.into_llm_response()?;
        log::debug!(
            "HttpLLMClient received content: {:?}",
            llm_response.content
        );
        Ok(llm_response)
    }
}
