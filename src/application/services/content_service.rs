use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{ContentBrief, ContentRequest, ValidationError};

use super::prompts::content_generation_request;

#[derive(Debug, Clone)]
pub struct ContentServiceConfig {
    pub model: String,
    pub max_tokens: u32,
}

/// Free-text content generation. Calls go straight to the model and bypass
/// the completion queue.
pub struct ContentService<L: ?Sized> {
    llm_client: Arc<L>,
    config: ContentServiceConfig,
}

impl<L> ContentService<L>
where
    L: LlmClient + ?Sized,
{
    pub fn new(llm_client: Arc<L>, config: ContentServiceConfig) -> Self {
        Self { llm_client, config }
    }

    /// Validates the request before anything is sent to the model.
    #[tracing::instrument(skip_all, fields(content_type = %request.content_type))]
    pub async fn generate(&self, request: ContentRequest) -> Result<String, ContentError> {
        let brief = ContentBrief::try_from(request)?;
        tracing::info!(
            topic = %brief.topic,
            tactics = ?brief.tactics,
            length = ?brief.length,
            "Generating content"
        );

        let chat_request =
            content_generation_request(&self.config.model, &brief, self.config.max_tokens);
        let content = self.llm_client.complete(&chat_request).await?;

        if content.trim().is_empty() {
            return Err(ContentError::Generation(LlmClientError::EmptyCompletion));
        }

        if !content.to_lowercase().contains(&brief.topic.to_lowercase()) {
            tracing::warn!(
                topic = %brief.topic,
                "Generated content may not focus sufficiently on the topic"
            );
        }

        Ok(content)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to generate content: {0}")]
    Generation(#[from] LlmClientError),
}
