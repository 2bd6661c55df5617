use async_trait::async_trait;
use riq_ai::{AiClient, AiError, AiResponse, ModelRequest};

/// Model client that is never reachable.
pub struct NoModel;

#[async_trait]
impl AiClient for NoModel {
    async fn send_message(&self, _request: &ModelRequest<'_>) -> Result<AiResponse, AiError> {
        Err(AiError::NetworkError("no model in tests".into()))
    }
}
