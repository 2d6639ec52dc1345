//! Configuration loading and validation tests

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::errors::AssistantError;
    use crate::modes::Mode;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env_files() -> &'static str {
        "environment:\n  env_files: []\n"
    }

    #[test]
    #[serial]
    fn empty_document_yields_defaults() {
        let config = ConfigLoader::from_str("").unwrap();

        assert_eq!(config.llm.provider, LlmProvider::Gemini);
        assert_eq!(config.llm.model_name(), "gemini-2.5-flash");
        assert!((config.llm.parameters.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.llm.auth.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.assistant.default_mode, Mode::CodeGenerator);
        assert_eq!(config.executor.timeout_secs, 10);
        assert_eq!(config.executor.interpreter, "python");
    }

    #[test]
    #[serial]
    fn version_string_is_composed_into_model_name() {
        let yaml = format!("{}llm:\n  model_version: \"1.5-pro\"\n", no_env_files());
        let config = ConfigLoader::from_str(&yaml).unwrap();
        assert_eq!(config.llm.model_name(), "gemini-1.5-pro");

        let yaml = format!(
            "{}llm:\n  model_version: \"1.5-pro\"\n  model: gemini-2.5-pro-preview-03-25\n",
            no_env_files()
        );
        let config = ConfigLoader::from_str(&yaml).unwrap();
        assert_eq!(config.llm.model_name(), "gemini-2.5-pro-preview-03-25");
    }

    #[test]
    #[serial]
    fn default_mode_and_overrides_parse_from_labels() {
        let yaml = format!(
            "{}assistant:\n  default_mode: \"Explain Code\"\nprompts:\n  modes:\n    Debugger: \"Only point at the bug.\"\n",
            no_env_files()
        );
        let config = ConfigLoader::from_str(&yaml).unwrap();
        assert_eq!(config.assistant.default_mode, Mode::ExplainCode);

        let registry = config.mode_registry().unwrap();
        assert_eq!(registry.instruction_for(Mode::Debugger), "Only point at the bug.");
    }

    #[test]
    #[serial]
    fn documentation_cannot_be_the_default_mode() {
        let yaml = format!("{}assistant:\n  default_mode: Documentation\n", no_env_files());
        let err = ConfigLoader::from_str(&yaml).unwrap_err();
        assert!(matches!(err, AssistantError::ConfigError(ref m) if m.contains("not selectable")));
    }

    #[test]
    #[serial]
    fn unknown_override_label_fails_validation() {
        let yaml = format!("{}prompts:\n  modes:\n    Poet: \"Rhyme.\"\n", no_env_files());
        let err = ConfigLoader::from_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("Invalid prompt override"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AssistantConfig::default();
        config.executor.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AssistantConfig::default();
        config.llm.parameters.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = AssistantConfig::default();
        config.llm.model_version = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = AssistantConfig::default();
        config.llm.provider = LlmProvider::Custom {
            base_url: String::new(),
        };
        assert!(config.validate().is_err());

        assert!(AssistantConfig::default().validate().is_ok());
    }

    #[test]
    #[serial]
    fn unknown_log_level_is_rejected() {
        let err = ConfigLoader::from_str(&format!(
            "{}logging:\n  level: loud\n",
            no_env_files()
        ))
        .unwrap_err();
        assert!(matches!(err, AssistantError::ConfigError(ref m) if m.contains("'loud'")));

        let mut config = AssistantConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn malformed_yaml_is_a_config_error() {
        let err = ConfigLoader::from_str("llm: [unclosed").unwrap_err();
        assert!(matches!(err, AssistantError::ConfigError(ref m) if m.starts_with("Failed to parse YAML config")));
    }

    #[test]
    #[serial]
    fn api_key_is_resolved_from_env_file() {
        std::env::remove_var("CODEMATE_TEST_KEY");
        let mut env_file = NamedTempFile::new().unwrap();
        writeln!(env_file, "# credentials").unwrap();
        writeln!(env_file, "CODEMATE_TEST_KEY=\"from-env-file\"").unwrap();

        let yaml = format!(
            "llm:\n  auth:\n    api_key_env: CODEMATE_TEST_KEY\nenvironment:\n  env_files: [\"{}\"]\n",
            env_file.path().display()
        );
        let config = ConfigLoader::from_str(&yaml).unwrap();
        assert_eq!(config.llm.auth.api_key.as_deref(), Some("from-env-file"));

        std::env::remove_var("CODEMATE_TEST_KEY");
    }

    #[test]
    #[serial]
    fn process_environment_wins_over_env_file() {
        std::env::set_var("CODEMATE_TEST_KEY", "from-process");
        let mut env_file = NamedTempFile::new().unwrap();
        writeln!(env_file, "export CODEMATE_TEST_KEY=from-file").unwrap();

        let yaml = format!(
            "llm:\n  auth:\n    api_key_env: CODEMATE_TEST_KEY\nenvironment:\n  env_files: [\"{}\"]\n",
            env_file.path().display()
        );
        let config = ConfigLoader::from_str(&yaml).unwrap();
        assert_eq!(config.llm.auth.api_key.as_deref(), Some("from-process"));

        std::env::remove_var("CODEMATE_TEST_KEY");
    }

    #[test]
    #[serial]
    fn missing_credential_is_left_for_client_construction() {
        std::env::remove_var("CODEMATE_ABSENT_KEY");
        let yaml = format!(
            "{}llm:\n  auth:\n    api_key_env: CODEMATE_ABSENT_KEY\n",
            no_env_files()
        );
        let config = ConfigLoader::from_str(&yaml).unwrap();
        assert!(config.llm.auth.api_key.is_none());
    }

    #[tokio::test]
    #[serial]
    async fn loads_from_file_and_falls_back_when_absent() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{}executor:\n  interpreter: python3\n  timeout_secs: 5\n",
            no_env_files()
        )
        .unwrap();

        let config = ConfigLoader::from_file(file.path()).await.unwrap();
        assert_eq!(config.executor.interpreter, "python3");
        assert_eq!(config.executor.timeout_secs, 5);

        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::from_file_or_default(dir.path().join("missing.yaml"))
            .await
            .unwrap();
        assert_eq!(config.llm.model_name(), "gemini-2.5-flash");

        let err = ConfigLoader::from_file(dir.path().join("missing.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::ConfigError(_)));
    }
}
