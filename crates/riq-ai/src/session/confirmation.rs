//! Local gate for data-changing tools.

use serde_json::{Map, Value};

use crate::tools::ToolResult;
use crate::ToolInvocation;

/// How mutating tool calls are authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationPolicy {
    /// The model is instructed to ask first; calls run as requested.
    #[default]
    ModelInstructed,
    /// A mutating call is held until the user affirms it. The affirmation
    /// releases only the held call, and only once.
    RequireUserConfirmation,
}

/// A mutating call held back until the user confirms.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub name: String,
    pub arguments: Map<String, Value>,
}

const AFFIRMATIONS: &[&str] = &[
    "yes", "y", "yep", "yeah", "yup", "sure", "ok", "okay", "confirm", "confirmed", "proceed",
    "go ahead", "do it", "please do", "correct", "approved",
];

const NEGATIONS: &[&str] = &["no", "not", "don", "cancel", "stop", "wait", "never"];

/// Whether `text` reads as the user agreeing to go ahead.
pub fn is_affirmative(text: &str) -> bool {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    if words.is_empty() || words.iter().any(|word| NEGATIONS.contains(word)) {
        return false;
    }
    AFFIRMATIONS.iter().any(|phrase| {
        let phrase: Vec<&str> = phrase.split(' ').collect();
        words.starts_with(&phrase)
    })
}

#[derive(Debug, Default)]
pub(crate) struct ConfirmationGate {
    policy: ConfirmationPolicy,
    pending: Option<PendingAction>,
    confirmed: bool,
}

impl ConfirmationGate {
    pub(crate) fn new(policy: ConfirmationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub(crate) fn policy(&self) -> ConfirmationPolicy {
        self.policy
    }

    pub(crate) fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub(crate) fn begin_turn(&mut self, user_text: &str) {
        if self.policy == ConfirmationPolicy::ModelInstructed {
            return;
        }
        self.confirmed = self.pending.is_some() && is_affirmative(user_text);
        if !self.confirmed {
            self.pending = None;
        }
    }

    /// `Err` carries the result to report instead of running the call.
    pub(crate) fn admit(&mut self, call: &ToolInvocation, mutating: bool) -> Result<(), ToolResult> {
        if !mutating || self.policy == ConfirmationPolicy::ModelInstructed {
            return Ok(());
        }
        let matches_pending = self
            .pending
            .as_ref()
            .is_some_and(|held| held.name == call.name && held.arguments == call.arguments);
        if self.confirmed && matches_pending {
            self.confirmed = false;
            self.pending = None;
            return Ok(());
        }

        self.confirmed = false;
        self.pending = Some(PendingAction {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        });
        Err(ToolResult::error(format!(
            "confirmation required: {} changes data and was not run. \
             Describe the change to the user and ask them to confirm.",
            call.name
        )))
    }

    pub(crate) fn clear(&mut self) {
        self.pending = None;
        self.confirmed = false;
    }
}
