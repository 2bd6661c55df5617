//! ConversationSession struct and history management.

use std::sync::Arc;

use riq_common::SessionId;

use crate::tools::ToolDispatcher;
use crate::{AiClient, Message};

use super::confirmation::{ConfirmationGate, ConfirmationPolicy, PendingAction};
use super::types::TurnState;

/// Tool-call rounds allowed per user turn unless configured otherwise.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 5;

/// One conversation with the assistant.
///
/// The session owns its history exclusively. `submit` takes `&mut self`,
/// so at most one turn is in flight per session.
pub struct ConversationSession {
    pub(super) id: SessionId,
    pub(super) client: Arc<dyn AiClient>,
    pub(super) dispatcher: Arc<ToolDispatcher>,
    pub(super) history: Vec<Message>,
    /// Fixed system instruction; rebuilt each turn with today's date when unset.
    pub(super) system_prompt: Option<String>,
    pub(super) max_tool_rounds: u32,
    pub(super) gate: ConfirmationGate,
    pub(super) state: TurnState,
}

impl ConversationSession {
    pub fn new(client: Arc<dyn AiClient>, dispatcher: Arc<ToolDispatcher>) -> Self {
        Self {
            id: SessionId::new(),
            client,
            dispatcher,
            history: Vec::new(),
            system_prompt: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            gate: ConfirmationGate::default(),
            state: TurnState::Idle,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn with_confirmation_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.gate = ConfirmationGate::new(policy);
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Get the full conversation history.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Number of messages in history.
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn max_tool_rounds(&self) -> u32 {
        self.max_tool_rounds
    }

    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        self.gate.policy()
    }

    /// The mutating call currently waiting for the user's confirmation.
    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.gate.pending()
    }

    /// Drop history and any pending confirmation.
    pub fn clear(&mut self) {
        self.history.clear();
        self.gate.clear();
        self.state = TurnState::Idle;
    }
}
