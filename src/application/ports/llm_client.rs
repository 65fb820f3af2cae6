use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ChatRequest;

/// A chat-completion endpoint. Implementations issue exactly one remote call
/// per invocation and return the first choice's message content.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("model API did not answer within {0:?}")]
    Timeout(Duration),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("model returned no content")]
    EmptyCompletion,
}
