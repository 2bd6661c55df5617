//! AiClient trait implementation for GeminiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{AiClient, AiError, AiResponse, ModelRequest};

use super::client::GeminiClient;

#[async_trait]
impl AiClient for GeminiClient {
    async fn send_message(&self, request: &ModelRequest<'_>) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(request);
        let url = self.api_url();

        debug!(
            model = %self.config.model,
            messages = request.history.len(),
            "Gemini API request"
        );

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout
            } else {
                AiError::ParseError(e.to_string())
            }
        })?;

        let parsed = self.parse_response(json)?;
        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "Gemini API response"
        );
        Ok(parsed)
    }
}

fn map_transport_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::{GeminiClient, GeminiConfig, Message, ModelReply};

    use super::*;

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            GeminiConfig::new("test-key")
                .with_base_url(format!("{}/v1beta/models", server.uri()))
                .with_timeout(Duration::from_millis(500)),
        )
        .unwrap()
    }

    fn request(history: &[Message]) -> ModelRequest<'_> {
        ModelRequest {
            system_instruction: "be brief",
            history,
            tools: &[],
        }
    }

    #[tokio::test]
    async fn sends_key_and_parses_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": "All stocked." }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let history = vec![Message::user("anything low?")];
        let response = client(&server)
            .send_message(&request(&history))
            .await
            .unwrap();
        assert_eq!(response.reply, ModelReply::Text("All stocked.".into()));
    }

    #[tokio::test]
    async fn status_429_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let history = vec![Message::user("hi")];
        let err = client(&server)
            .send_message(&request(&history))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::RateLimited));
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let history = vec![Message::user("hi")];
        let err = client(&server)
            .send_message(&request(&history))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::ApiError(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "candidates": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let history = vec![Message::user("hi")];
        let err = client(&server)
            .send_message(&request(&history))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Timeout));
    }
}
