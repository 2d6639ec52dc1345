//! Session-level operations: uploads, mode changes, chat and analysis.
//!
//! `Assistant` holds the stateless collaborators. All per-conversation state
//! lives in the `Session` handed to each call.

use std::sync::Arc;

use crate::analysis::analyze_uploads;
use crate::chat::ChatClient;
use crate::config::AssistantConfig;
use crate::core_types::{Reply, Role};
use crate::errors::AssistantError;
use crate::extract::{TextExtractor, Upload};
use crate::llm::providers::create_llm_client;
use crate::llm::LLM;
use crate::modes::{Mode, ModeRegistry};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored { extraction_failed: bool },
    AlreadyPresent,
}

pub struct Assistant {
    client: ChatClient,
    extractor: TextExtractor,
}

impl Assistant {
    pub fn new(llm: Arc<dyn LLM>, registry: ModeRegistry) -> Self {
        Self {
            client: ChatClient::new(llm, Arc::new(registry)),
            extractor: TextExtractor::default(),
        }
    }

    /// Builds the provider client and mode registry described by `config`.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let registry = config.mode_registry()?;
        let llm = create_llm_client(&config.llm)?;
        log::info!("Assistant ready with model {}", config.llm.model_name());
        Ok(Self::new(llm, registry))
    }

    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    pub fn registry(&self) -> &ModeRegistry {
        self.client.registry()
    }

    /// Ingests one file. Names already present are skipped without extraction.
    pub fn upload(
        &self,
        session: &mut Session,
        upload: &Upload,
    ) -> Result<UploadOutcome, AssistantError> {
        upload.ensure_supported()?;
        if session.contains_upload(&upload.name) {
            log::info!("'{}' was already uploaded, keeping the first copy", upload.name);
            return Ok(UploadOutcome::AlreadyPresent);
        }

        let extraction = self.extractor.extract_or_placeholder(upload);
        if extraction.failed {
            session.record_extraction_failure(&upload.name, extraction.text);
        } else {
            session.record_extracted_text(&upload.name, extraction.text);
        }
        Ok(UploadOutcome::Stored {
            extraction_failed: extraction.failed,
        })
    }

    pub fn select_mode(&self, session: &mut Session, mode: Mode) -> Result<(), AssistantError> {
        if !mode.is_selectable() {
            return Err(AssistantError::ValidationError(format!(
                "'{}' mode cannot be selected",
                mode
            )));
        }
        session.set_mode(mode);
        Ok(())
    }

    /// Appends the user turn, asks the model and appends whatever comes back.
    /// A failed request is recorded as the assistant turn carrying the error text.
    pub async fn submit(&self, session: &mut Session, prompt: &str) -> Reply {
        session.append_message(Role::User, prompt);
        let reply = match self.client.send(session.mode(), session.messages()).await {
            Ok(text) => Reply::success(text),
            Err(e) => Reply::failed(e),
        };
        session.append_message(Role::Assistant, reply.content.clone());
        reply
    }

    pub async fn analyze(&self, session: &mut Session) -> Result<Reply, AssistantError> {
        analyze_uploads(session, &self.client).await
    }
}
