//! Configuration type definitions
//!
//! Every section is optional in YAML; an empty file (or no file at all)
//! yields a Gemini `2.5-flash` client at temperature 0.2, Code Generator as
//! the starting mode and a 10 second snippet timeout.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::AssistantError;
use crate::modes::{Mode, ModeRegistry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub prompts: PromptConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantSettings {
    #[serde(default)]
    pub default_mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    /// Composed into the model name as `gemini-<model_version>`.
    #[serde(default = "default_model_version")]
    pub model_version: String,
    /// Full model name; wins over `model_version` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub parameters: ModelParameters,
    #[serde(default)]
    pub auth: LlmAuth,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model_version: default_model_version(),
            model: None,
            parameters: ModelParameters::default(),
            auth: LlmAuth::default(),
        }
    }
}

impl LlmConfig {
    pub fn model_name(&self) -> String {
        match &self.model {
            Some(model) => model.clone(),
            None => format!("gemini-{}", self.model_version),
        }
    }
}

/// LLM provider types
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    /// OpenAI-compatible `/v1/chat/completions` endpoint.
    Custom { base_url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output_tokens: None,
            top_p: None,
            stop_sequences: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAuth {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LlmAuth {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Per-mode instruction overrides keyed by mode label.
    #[serde(default)]
    pub modes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default = "default_code_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            timeout_secs: default_code_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_env_files")]
    pub env_files: Vec<PathBuf>,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            env_files: default_env_files(),
            variables: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl AssistantConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AssistantError> {
        if self.llm.model.is_none() && self.llm.model_version.trim().is_empty() {
            return Err(AssistantError::ConfigError(
                "LLM model_version cannot be empty".to_string(),
            ));
        }

        if let Some(model) = &self.llm.model {
            if model.trim().is_empty() {
                return Err(AssistantError::ConfigError("LLM model cannot be empty".to_string()));
            }
        }

        if let LlmProvider::Custom { base_url } = &self.llm.provider {
            if base_url.is_empty() {
                return Err(AssistantError::ConfigError(
                    "Custom provider requires a valid 'base_url'".to_string(),
                ));
            }
        }

        let temperature = self.llm.parameters.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AssistantError::ConfigError(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }

        if !self.assistant.default_mode.is_selectable() {
            return Err(AssistantError::ConfigError(format!(
                "Default mode '{}' is not selectable",
                self.assistant.default_mode
            )));
        }

        if self.executor.timeout_secs == 0 {
            return Err(AssistantError::ConfigError(
                "Executor timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.executor.interpreter.trim().is_empty() {
            return Err(AssistantError::ConfigError(
                "Executor interpreter cannot be empty".to_string(),
            ));
        }

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(AssistantError::ConfigError(format!(
                "Invalid log level '{}', expected one of off, error, warn, info, debug, trace",
                self.logging.level
            )));
        }

        // Surfaces unknown labels in prompt overrides at load time.
        self.mode_registry()?;

        Ok(())
    }

    pub fn mode_registry(&self) -> Result<ModeRegistry, AssistantError> {
        ModeRegistry::default()
            .with_overrides(&self.prompts.modes)
            .map_err(|e| AssistantError::ConfigError(format!("Invalid prompt override: {}", e)))
    }
}

fn default_model_version() -> String { "2.5-flash".to_string() }
fn default_temperature() -> f32 { 0.2 }
fn default_api_key_env() -> String { "GOOGLE_API_KEY".to_string() }
fn default_interpreter() -> String { "python".to_string() }
fn default_code_timeout() -> u64 { 10 }
fn default_env_files() -> Vec<PathBuf> { vec![PathBuf::from(".env")] }
fn default_log_level() -> String { "info".to_string() }
fn default_log_file() -> PathBuf { PathBuf::from("codemate.log") }
