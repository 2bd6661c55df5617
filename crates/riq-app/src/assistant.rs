//! Wires config and credentials into shared clients.

use std::sync::Arc;
use std::time::Duration;

use riq_ai::{
    AiClient, ConfirmationPolicy, ConversationSession, GeminiClient, GeminiConfig, ToolCatalog,
    ToolDispatcher,
};
use riq_backend::{Backend, PostgrestClient, PostgrestConfig};
use riq_common::RiqError;
use riq_config::{Credentials, RiqConfig, SessionConfig};

/// Process-wide collaborators shared by every conversation.
pub struct Assistant {
    client: Arc<dyn AiClient>,
    dispatcher: Arc<ToolDispatcher>,
    session: SessionConfig,
}

impl Assistant {
    /// Build from config with credentials taken from the environment.
    pub fn from_env(config: &RiqConfig) -> riq_common::Result<Self> {
        let credentials = Credentials::from_env()?;
        Self::new(config, &credentials)
    }

    pub fn from_lookup(
        config: &RiqConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> riq_common::Result<Self> {
        let credentials = Credentials::from_lookup(lookup)?;
        Self::new(config, &credentials)
    }

    pub fn new(config: &RiqConfig, credentials: &Credentials) -> riq_common::Result<Self> {
        let gemini = GeminiClient::new(
            GeminiConfig::new(credentials.gemini_api_key.as_str())
                .with_model(config.model.model.as_str())
                .with_max_tokens(config.model.max_output_tokens)
                .with_temperature(config.model.temperature)
                .with_timeout(Duration::from_secs(config.model.timeout_secs)),
        )
        .map_err(|e| RiqError::Ai(e.to_string()))?;

        let backend = PostgrestClient::new(
            PostgrestConfig::new(
                credentials.backend_url.as_str(),
                credentials.backend_key.as_str(),
            )
            .with_timeout(Duration::from_secs(config.backend.timeout_secs)),
        )
        .map_err(|e| RiqError::Backend(e.to_string()))?;

        Ok(Self::from_parts(
            Arc::new(gemini),
            Arc::new(backend),
            config.session.clone(),
        ))
    }

    pub fn from_parts(
        client: Arc<dyn AiClient>,
        backend: Arc<dyn Backend>,
        session: SessionConfig,
    ) -> Self {
        Self {
            client,
            dispatcher: Arc::new(ToolDispatcher::new(ToolCatalog::restaurant(), backend)),
            session,
        }
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// A fresh conversation using the configured session limits.
    pub fn new_session(&self) -> ConversationSession {
        let policy = if self.session.require_confirmation {
            ConfirmationPolicy::RequireUserConfirmation
        } else {
            ConfirmationPolicy::ModelInstructed
        };
        ConversationSession::new(self.client.clone(), self.dispatcher.clone())
            .with_max_tool_rounds(self.session.max_tool_rounds)
            .with_confirmation_policy(policy)
    }
}
