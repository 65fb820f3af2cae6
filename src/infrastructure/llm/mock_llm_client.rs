use std::collections::VecDeque;
use std::sync::Mutex;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::ChatRequest;

/// Replays scripted replies in order, then falls back to an empty JSON object.
/// Every request is recorded for inspection.
#[derive(Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<Result<String, LlmClientError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: Vec<Result<String, LlmClientError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmClientError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Ok("{}".to_string()))
    }
}
