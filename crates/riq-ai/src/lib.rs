//! Conversational engine for the RestaurantIQ assistant.
//!
//! Provides:
//! - the `AiClient` seam plus a Gemini implementation with function calling
//! - the fixed restaurant tool catalog and typed tool arguments
//! - `ToolDispatcher`, which validates tool calls and runs them against
//!   the data backend or the local revenue forecaster
//! - `ConversationSession`, which drives the model/tool loop for one
//!   conversation

pub mod gemini;
pub mod prompt;
pub mod session;
pub mod tools;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use gemini::{GeminiClient, GeminiConfig};
pub use session::{
    ConfirmationPolicy, ConversationSession, PendingAction, StopReason, TurnOutcome, TurnState,
};
pub use tools::{ToolCatalog, ToolDefinition, ToolDispatcher, ToolResult};

#[async_trait]
pub trait AiClient: Send + Sync {
    async fn send_message(&self, request: &ModelRequest<'_>) -> Result<AiResponse, AiError>;
}

/// Everything the model sees on one call.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub system_instruction: &'a str,
    pub history: &'a [Message],
    pub tools: &'a [ToolDefinition],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Tool,
}

/// A model-issued request to run one catalog tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Pairs the call with its result in history.
    pub id: String,
    pub name: String,
    /// Untrusted: the declared schema is advisory to the model.
    pub arguments: Map<String, Value>,
}

/// The outcome of a tool call as fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub call_id: String,
    pub name: String,
    pub result: ToolResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    ToolCall(ToolInvocation),
    ToolResult(ToolResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn tool_call(call: ToolInvocation) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::ToolCall(call)],
        }
    }

    pub fn tool_result(response: ToolResponse) -> Self {
        Self {
            role: Role::Tool,
            parts: vec![Part::ToolResult(response)],
        }
    }

    /// First text part, if any.
    pub fn text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            Part::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn as_tool_call(&self) -> Option<&ToolInvocation> {
        self.parts.iter().find_map(|part| match part {
            Part::ToolCall(call) => Some(call),
            _ => None,
        })
    }

    pub fn as_tool_result(&self) -> Option<&ToolResponse> {
        self.parts.iter().find_map(|part| match part {
            Part::ToolResult(response) => Some(response),
            _ => None,
        })
    }
}

/// What the model chose to do with its turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Text(String),
    ToolCall(ToolInvocation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiResponse {
    pub reply: ModelReply,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

impl AiError {
    /// One plain sentence for the end user. Detail stays in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NetworkError(_) | Self::Timeout => {
                "Sorry, I couldn't reach the AI service. Please check the connection and try again."
            }
            Self::RateLimited => {
                "Sorry, the AI service is busy right now. Please try again in a moment."
            }
            Self::ApiError(_) => {
                "Sorry, the AI service returned an error, so I couldn't answer that. Please try again."
            }
            Self::ParseError(_) => {
                "Sorry, I got an unexpected reply from the AI service. Please try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_accessors() {
        let call = ToolInvocation {
            id: "c1".into(),
            name: "get_inventory_snapshot".into(),
            arguments: Map::new(),
        };
        let msg = Message::tool_call(call.clone());
        assert_eq!(msg.role, Role::Model);
        assert_eq!(msg.as_tool_call(), Some(&call));
        assert!(msg.text().is_none());

        let msg = Message::user("what's low?");
        assert_eq!(msg.text(), Some("what's low?"));
        assert!(msg.as_tool_result().is_none());
    }

    #[test]
    fn user_messages_hide_transport_detail() {
        let err = AiError::NetworkError("dns error: lookup generativelanguage failed".into());
        assert!(!err.user_message().contains("dns"));
        let err = AiError::ApiError("HTTP 500: {\"error\":{}}".into());
        assert!(!err.user_message().contains("500"));
    }

    #[test]
    fn token_usage_total_saturates() {
        let usage = TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 1,
        };
        assert_eq!(usage.total_tokens(), u64::MAX);
    }
}
