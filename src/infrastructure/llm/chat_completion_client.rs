use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::ChatRequest;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::LlmSettings;

/// OpenAI-compatible `/chat/completions` client (Groq by default).
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1";

    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, LlmClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmClientError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn transport_error(&self, error: reqwest::Error) -> LlmClientError {
        if error.is_timeout() {
            LlmClientError::Timeout(self.timeout)
        } else {
            LlmClientError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl LlmClient for ChatCompletionClient {
    #[tracing::instrument(skip_all, fields(model = %request.model))]
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmClientError> {
        tracing::debug!(
            prompt = %sanitize_prompt(request.user_prompt()),
            max_tokens = ?request.max_tokens,
            "Sending chat completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Model API error");
            return Err(LlmClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let completion: ChatCompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmClientError::EmptyCompletion)?;

        tracing::debug!(reply = %sanitize_prompt(&content), "Model replied");
        Ok(content)
    }
}

pub fn create_chat_completion_client(
    settings: &LlmSettings,
) -> Result<ChatCompletionClient, LlmClientError> {
    let base_url = settings
        .base_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(ChatCompletionClient::DEFAULT_BASE_URL);

    ChatCompletionClient::new(
        base_url,
        &settings.api_key,
        Duration::from_secs(settings.request_timeout_seconds),
    )
}
