//! Gemini API client struct, request building, and response parsing.

use riq_common::new_correlation_id;
use serde_json::{json, Map, Value};

use crate::tools::to_gemini_tool;
use crate::{
    AiError, AiResponse, Message, ModelReply, ModelRequest, Part, Role, TokenUsage,
    ToolInvocation,
};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, request: &ModelRequest<'_>) -> Value {
        let contents: Vec<Value> = request.history.iter().map(content_for).collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        if !request.system_instruction.is_empty() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": request.system_instruction }]
            });
        }

        if !request.tools.is_empty() {
            let tool_defs: Vec<_> = request.tools.iter().map(to_gemini_tool).collect();
            body["tools"] = json!([{
                "functionDeclarations": tool_defs
            }]);
        }

        body
    }

    /// Parse a Gemini response.
    ///
    /// A function call anywhere in the first candidate wins over text;
    /// only the first one is taken.
    pub(crate) fn parse_response(&self, json: Value) -> Result<AiResponse, AiError> {
        let usage = TokenUsage {
            input_tokens: json["usageMetadata"]["promptTokenCount"]
                .as_u64()
                .unwrap_or(0),
            output_tokens: json["usageMetadata"]["candidatesTokenCount"]
                .as_u64()
                .unwrap_or(0),
        };

        let Some(first) = json["candidates"].as_array().and_then(|c| c.first()) else {
            if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
                return Err(AiError::ApiError(format!("prompt blocked: {reason}")));
            }
            return Err(AiError::ParseError("no candidates in response".to_string()));
        };

        let parts = first["content"]["parts"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default();

        if let Some(fc) = parts.iter().find_map(|part| part.get("functionCall")) {
            let name = fc["name"]
                .as_str()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| AiError::ParseError("function call without a name".to_string()))?;
            let arguments = match &fc["args"] {
                Value::Null => Map::new(),
                Value::Object(args) => args.clone(),
                other => {
                    return Err(AiError::ParseError(format!(
                        "function call arguments are not an object: {other}"
                    )))
                }
            };
            return Ok(AiResponse {
                reply: ModelReply::ToolCall(ToolInvocation {
                    id: new_correlation_id(),
                    name: name.to_string(),
                    arguments,
                }),
                usage,
            });
        }

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        Ok(AiResponse {
            reply: ModelReply::Text(text),
            usage,
        })
    }
}

fn content_for(message: &Message) -> Value {
    let role = match message.role {
        Role::User => "user",
        Role::Model => "model",
        Role::Tool => "function",
    };
    let parts: Vec<Value> = message.parts.iter().map(part_for).collect();
    json!({ "role": role, "parts": parts })
}

fn part_for(part: &Part) -> Value {
    match part {
        Part::Text(text) => json!({ "text": text }),
        Part::ToolCall(call) => json!({
            "functionCall": { "name": call.name, "args": call.arguments }
        }),
        Part::ToolResult(response) => json!({
            "functionResponse": {
                "name": response.name,
                "response": { "content": response.result },
            }
        }),
    }
}
