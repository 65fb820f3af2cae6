use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use crate::application::ports::{LlmClient, LlmClientError};

use super::prompts::json_completion_request;
use super::response_normalizer::{JsonObject, NormalizeError, ParseStrategy, normalize};

type CompletionReply = oneshot::Sender<Result<JsonObject, CompletionError>>;

#[derive(Debug, Clone)]
pub struct CompletionQueueConfig {
    pub model: String,
    pub call_timeout: Duration,
}

struct QueuedRequest {
    prompt: String,
    reply: CompletionReply,
    enqueued_at: Instant,
}

/// Handle to a single-flight FIFO of JSON completions.
///
/// Every clone feeds the same worker. The worker owns the queue and makes one
/// model call at a time, in submission order, so callers never race each other
/// against the remote API. Depth is unbounded.
#[derive(Clone)]
pub struct CompletionQueue {
    sender: mpsc::UnboundedSender<QueuedRequest>,
    depth: Arc<AtomicUsize>,
}

/// The result slot for one submitted prompt.
pub struct PendingCompletion {
    receiver: oneshot::Receiver<Result<JsonObject, CompletionError>>,
}

impl PendingCompletion {
    pub async fn wait(self) -> Result<JsonObject, CompletionError> {
        self.receiver
            .await
            .unwrap_or(Err(CompletionError::QueueClosed))
    }
}

impl CompletionQueue {
    /// Builds the queue handle and its worker. The worker does nothing until
    /// `run` is awaited, usually on a spawned task.
    pub fn new<L>(llm_client: Arc<L>, config: CompletionQueueConfig) -> (Self, CompletionWorker<L>)
    where
        L: LlmClient + ?Sized,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));

        let queue = Self {
            sender,
            depth: Arc::clone(&depth),
        };
        let worker = CompletionWorker {
            receiver,
            llm_client,
            config,
            depth,
        };

        (queue, worker)
    }

    /// Builds the queue and spawns its worker on the current runtime.
    pub fn spawn<L>(llm_client: Arc<L>, config: CompletionQueueConfig) -> Self
    where
        L: LlmClient + ?Sized + 'static,
    {
        let (queue, worker) = Self::new(llm_client, config);
        tokio::spawn(worker.run());
        queue
    }

    /// Appends a prompt to the tail of the queue without waiting for it.
    pub fn submit(&self, prompt: impl Into<String>) -> Result<PendingCompletion, CompletionError> {
        let (reply, receiver) = oneshot::channel();
        let request = QueuedRequest {
            prompt: prompt.into(),
            reply,
            enqueued_at: Instant::now(),
        };

        let depth = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        if self.sender.send(request).is_err() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            return Err(CompletionError::QueueClosed);
        }

        tracing::debug!(queue_depth = depth, "Prompt enqueued");
        Ok(PendingCompletion { receiver })
    }

    /// Submits a prompt and waits for its normalized JSON reply.
    pub async fn enqueue(&self, prompt: impl Into<String>) -> Result<JsonObject, CompletionError> {
        self.submit(prompt)?.wait().await
    }

    /// Requests waiting for dispatch, excluding the one in flight.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

pub struct CompletionWorker<L: ?Sized> {
    receiver: mpsc::UnboundedReceiver<QueuedRequest>,
    llm_client: Arc<L>,
    config: CompletionQueueConfig,
    depth: Arc<AtomicUsize>,
}

impl<L> CompletionWorker<L>
where
    L: LlmClient + ?Sized,
{
    pub async fn run(mut self) {
        tracing::info!(model = %self.config.model, "Completion worker started");

        while let Some(request) = self.receiver.recv().await {
            let queued_behind = self.depth.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            let span = tracing::info_span!(
                "completion",
                queue_wait_ms = request.enqueued_at.elapsed().as_millis() as u64,
                queued_behind,
            );

            let result = self.dispatch(&request.prompt).instrument(span).await;

            if request.reply.send(result).is_err() {
                tracing::warn!("Caller went away before its completion was delivered");
            }
        }

        tracing::info!("Completion worker stopped: queue closed");
    }

    async fn dispatch(&self, prompt: &str) -> Result<JsonObject, CompletionError> {
        let request = json_completion_request(&self.config.model, prompt);
        tracing::debug!(prompt_chars = prompt.len(), "Sending prompt to model");

        let raw = tokio::time::timeout(self.config.call_timeout, self.llm_client.complete(&request))
            .await
            .map_err(|_| {
                tracing::error!(timeout = ?self.config.call_timeout, "Model call timed out");
                CompletionError::Timeout(self.config.call_timeout)
            })?
            .inspect_err(|e| tracing::error!(error = %e, "Model call failed"))?;

        let reply = normalize(&raw).inspect_err(|e| {
            tracing::error!(error = %e, reply_chars = raw.len(), "Model reply is not a JSON object");
        })?;

        if reply.strategy == ParseStrategy::Extracted {
            tracing::warn!("Direct JSON parse failed, recovered object from surrounding text");
        }

        Ok(reply.object)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("model API returned {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response from model API: {0}")]
    InvalidResponse(String),
    #[error("malformed model output: {0}")]
    MalformedOutput(#[from] NormalizeError),
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("completion queue is closed")]
    QueueClosed,
}

impl From<LlmClientError> for CompletionError {
    fn from(error: LlmClientError) -> Self {
        match error {
            LlmClientError::Api { status, body } => Self::Remote { status, body },
            LlmClientError::Transport(msg) => Self::Transport(msg),
            LlmClientError::Timeout(after) => Self::Timeout(after),
            LlmClientError::InvalidResponse(msg) => Self::InvalidResponse(msg),
            LlmClientError::EmptyCompletion => {
                Self::InvalidResponse("model returned no content".to_string())
            }
        }
    }
}
