//! The turn loop.

use tracing::{debug, info, warn};

use crate::prompt::system_instructions;
use crate::{Message, ModelReply, ModelRequest, ToolResponse};

use super::manager::ConversationSession;
use super::types::{TurnOutcome, TurnState};

pub(crate) const EMPTY_REPLY_TEXT: &str = "I'm not sure how to respond to that.";

impl ConversationSession {
    /// Run one user turn to completion.
    ///
    /// Never fails: model errors come back as an error outcome. A tool
    /// call and its result are appended together after the tool finishes,
    /// so dropping this future mid-turn leaves history consistent.
    #[tracing::instrument(skip_all, fields(session = %self.id))]
    pub async fn submit(&mut self, user_text: &str) -> TurnOutcome {
        self.state = TurnState::Idle;
        self.gate.begin_turn(user_text);
        self.history.push(Message::user(user_text));

        let system = match &self.system_prompt {
            Some(prompt) => prompt.clone(),
            None => system_instructions(chrono::Local::now().date_naive()),
        };
        let mut rounds = 0;

        loop {
            self.state = TurnState::AwaitingModel { round: rounds };
            let response = {
                let request = ModelRequest {
                    system_instruction: &system,
                    history: &self.history,
                    tools: self.dispatcher.catalog().definitions(),
                };
                self.client.send_message(&request).await
            };

            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, rounds, "model call failed");
                    self.state = TurnState::Idle;
                    return TurnOutcome::failed(e.user_message(), rounds);
                }
            };
            debug!(
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "model replied"
            );

            let call = match response.reply {
                ModelReply::Text(text) => {
                    let text = if text.trim().is_empty() {
                        EMPTY_REPLY_TEXT.to_string()
                    } else {
                        text
                    };
                    self.history.push(Message::model_text(text.clone()));
                    self.state = TurnState::Idle;
                    info!(rounds, "turn answered");
                    return TurnOutcome::answered(text, rounds);
                }
                ModelReply::ToolCall(call) => call,
            };

            if rounds >= self.max_tool_rounds {
                warn!(tool = %call.name, rounds, "tool round limit reached");
                let text = format!(
                    "Sorry, I couldn't complete that request within {} tool steps. \
                     Try asking for something more specific.",
                    self.max_tool_rounds
                );
                self.history.push(Message::model_text(text.clone()));
                self.state = TurnState::Idle;
                return TurnOutcome::round_limit(text, rounds);
            }

            rounds += 1;
            self.state = TurnState::ExecutingTool {
                round: rounds,
                tool: call.name.clone(),
            };

            let mutating = self.dispatcher.catalog().is_mutating(&call.name);
            let result = match self.gate.admit(&call, mutating) {
                Ok(()) => self.dispatcher.execute(&call.name, &call.arguments).await,
                Err(held) => {
                    info!(tool = %call.name, "mutating tool held for confirmation");
                    held
                }
            };

            let response = ToolResponse {
                call_id: call.id.clone(),
                name: call.name.clone(),
                result,
            };
            self.history.push(Message::tool_call(call));
            self.history.push(Message::tool_result(response));
        }
    }
}
