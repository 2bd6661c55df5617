//! Conversation session management.
//!
//! A `ConversationSession` owns one conversation's history and drives
//! the model/tool loop for each user turn.

mod chat;
mod confirmation;
mod manager;
mod types;


pub use confirmation::{is_affirmative, ConfirmationPolicy, PendingAction};
pub use manager::{ConversationSession, DEFAULT_MAX_TOOL_ROUNDS};
pub use types::{StopReason, TurnOutcome, TurnState};
