//! Configuration loader for YAML files and environment resolution
//!
//! Loading order: parse YAML, apply `.env`-style files and inline variables
//! to the process environment, resolve the provider credential, validate.

use crate::config::types::*;
use crate::errors::AssistantError;
use std::env;
use std::path::Path;
use tokio::fs;

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<AssistantConfig, AssistantError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            AssistantError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub async fn from_file_or_default<P: AsRef<Path>>(
        path: P,
    ) -> Result<AssistantConfig, AssistantError> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            log::info!("Loading configuration from file: {}", path.display());
            Self::from_file(path).await
        } else {
            log::info!(
                "No configuration file at {}, using defaults",
                path.display()
            );
            Self::resolve(AssistantConfig::default())
        }
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<AssistantConfig, AssistantError> {
        let config: AssistantConfig = if content.trim().is_empty() {
            AssistantConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                AssistantError::ConfigError(format!("Failed to parse YAML config: {}", e))
            })?
        };

        Self::resolve(config)
    }

    /// Resolve environment and validate an already built configuration.
    pub fn resolve(mut config: AssistantConfig) -> Result<AssistantConfig, AssistantError> {
        Self::resolve_environment(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn resolve_environment(config: &mut AssistantConfig) -> Result<(), AssistantError> {
        for env_file in &config.environment.env_files {
            if env_file.exists() {
                log::debug!("Loading environment file {}", env_file.display());
                Self::load_env_file(env_file)?;
            }
        }

        for (key, value) in &config.environment.variables {
            env::set_var(key, value);
        }

        Self::resolve_llm_auth(&mut config.llm.auth);
        Ok(())
    }

    /// Load environment variables from a file
    fn load_env_file<P: AsRef<Path>>(path: P) -> Result<(), AssistantError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AssistantError::ConfigError(format!(
                "Failed to read env file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                // Variables already set in the process win over the file.
                if env::var_os(key).is_some() {
                    continue;
                }
                let value = value.trim().trim_matches('"').trim_matches('\'');
                env::set_var(key, value);
            }
        }

        Ok(())
    }

    /// An explicit `api_key` wins; otherwise read the configured variable.
    /// A missing credential is not an error here: client construction reports it.
    fn resolve_llm_auth(auth: &mut LlmAuth) {
        if auth.api_key.is_some() {
            return;
        }
        match env::var(&auth.api_key_env) {
            Ok(key) if !key.trim().is_empty() => auth.api_key = Some(key),
            _ => log::debug!("{} is not set", auth.api_key_env),
        }
    }
}
