use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use insight_relay::application::ports::{LlmClient, LlmClientError};
use insight_relay::application::services::prompts::JSON_ONLY_SYSTEM_PROMPT;
use insight_relay::application::services::{
    CompletionError, CompletionQueue, CompletionQueueConfig, NormalizeError,
};
use insight_relay::domain::ChatRequest;
use insight_relay::infrastructure::llm::MockLlmClient;

const TEST_MODEL: &str = "test-model";

fn config(call_timeout: Duration) -> CompletionQueueConfig {
    CompletionQueueConfig {
        model: TEST_MODEL.to_string(),
        call_timeout,
    }
}

/// Echoes the prompt back as JSON after a delay and records how many calls
/// overlapped.
struct IntervalRecordingLlmClient {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl IntervalRecordingLlmClient {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for IntervalRecordingLlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmClientError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let prompt = request.user_prompt().to_string();
        self.seen.lock().unwrap().push(prompt.clone());

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(serde_json::json!({ "prompt": prompt }).to_string())
    }
}

/// Never answers a prompt containing "hang"; echoes everything else.
struct HangingLlmClient;

#[async_trait::async_trait]
impl LlmClient for HangingLlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmClientError> {
        if request.user_prompt().contains("hang") {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(r#"{"answered":true}"#.to_string())
    }
}

#[tokio::test]
async fn given_prompts_submitted_in_order_when_draining_then_dispatches_fifo() {
    let client = Arc::new(IntervalRecordingLlmClient::new(Duration::from_millis(5)));
    let queue = CompletionQueue::spawn(Arc::clone(&client), config(Duration::from_secs(5)));

    let pending: Vec<_> = (0..5)
        .map(|i| queue.submit(format!("prompt-{i}")).unwrap())
        .collect();

    for (i, slot) in pending.into_iter().enumerate() {
        let result = slot.wait().await.unwrap();
        assert_eq!(result["prompt"], format!("prompt-{i}"));
    }

    let seen = client.seen.lock().unwrap().clone();
    let expected: Vec<String> = (0..5).map(|i| format!("prompt-{i}")).collect();
    assert_eq!(seen, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_callers_when_enqueueing_then_only_one_call_is_in_flight() {
    let client = Arc::new(IntervalRecordingLlmClient::new(Duration::from_millis(20)));
    let queue = CompletionQueue::spawn(Arc::clone(&client), config(Duration::from_secs(5)));

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let queue = queue.clone();
            tokio::spawn(async move { queue.enqueue(format!("caller-{i}")).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(client.seen.lock().unwrap().len(), 6);
}

#[tokio::test]
async fn given_failing_and_malformed_replies_when_draining_then_later_items_still_succeed() {
    let client = Arc::new(MockLlmClient::with_replies(vec![
        Err(LlmClientError::Api {
            status: 500,
            body: "upstream exploded".to_string(),
        }),
        Ok("I cannot help with that".to_string()),
        Ok(r#"Sure! {"summary": ["ok"]}"#.to_string()),
    ]));
    let queue = CompletionQueue::spawn(Arc::clone(&client), config(Duration::from_secs(5)));

    let first = queue.submit("one").unwrap();
    let second = queue.submit("two").unwrap();
    let third = queue.submit("three").unwrap();

    assert!(matches!(
        first.wait().await,
        Err(CompletionError::Remote { status: 500, .. })
    ));
    assert!(matches!(
        second.wait().await,
        Err(CompletionError::MalformedOutput(NormalizeError::NoJsonObject))
    ));
    let third = third.wait().await.unwrap();
    assert!(third.contains_key("summary"));
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn given_call_exceeding_timeout_when_draining_then_rejects_it_and_moves_on() {
    let queue = CompletionQueue::spawn(
        Arc::new(HangingLlmClient),
        config(Duration::from_millis(50)),
    );

    let stuck = queue.submit("please hang").unwrap();
    let next = queue.submit("answer me").unwrap();

    assert!(matches!(stuck.wait().await, Err(CompletionError::Timeout(_))));
    assert_eq!(next.wait().await.unwrap()["answered"], true);
}

#[tokio::test]
async fn given_queued_prompt_when_dispatching_then_sends_json_only_request() {
    let client = Arc::new(MockLlmClient::with_replies(vec![Ok("{}".to_string())]));
    let queue = CompletionQueue::spawn(Arc::clone(&client), config(Duration::from_secs(5)));

    queue.enqueue("Summarize").await.unwrap();

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, TEST_MODEL);
    assert_eq!(requests[0].messages[0].content, JSON_ONLY_SYSTEM_PROMPT);
    assert_eq!(requests[0].user_prompt(), "Summarize");
}

#[tokio::test]
async fn given_worker_not_running_when_submitting_then_depth_counts_waiting_items() {
    let client = Arc::new(MockLlmClient::new());
    let (queue, worker) = CompletionQueue::new(Arc::clone(&client), config(Duration::from_secs(5)));

    let pending: Vec<_> = (0..3).map(|i| queue.submit(format!("p{i}")).unwrap()).collect();
    assert_eq!(queue.depth(), 3);
    assert_eq!(client.call_count(), 0);

    tokio::spawn(worker.run());
    for slot in pending {
        slot.wait().await.unwrap();
    }

    assert_eq!(queue.depth(), 0);
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn given_dropped_worker_when_submitting_then_returns_queue_closed() {
    let (queue, worker) =
        CompletionQueue::new(Arc::new(MockLlmClient::new()), config(Duration::from_secs(5)));
    drop(worker);

    let result = queue.submit("orphan");

    assert!(matches!(result, Err(CompletionError::QueueClosed)));
    assert_eq!(queue.depth(), 0);
}

#[tokio::test]
async fn given_worker_dropped_after_submit_when_waiting_then_returns_queue_closed() {
    let (queue, worker) =
        CompletionQueue::new(Arc::new(MockLlmClient::new()), config(Duration::from_secs(5)));
    let pending = queue.submit("never dispatched").unwrap();

    drop(worker);

    assert!(matches!(pending.wait().await, Err(CompletionError::QueueClosed)));
}

#[tokio::test]
async fn given_abandoned_caller_when_draining_then_next_caller_is_still_served() {
    let client = Arc::new(MockLlmClient::with_replies(vec![
        Ok(r#"{"n":1}"#.to_string()),
        Ok(r#"{"n":2}"#.to_string()),
    ]));
    let queue = CompletionQueue::spawn(Arc::clone(&client), config(Duration::from_secs(5)));

    drop(queue.submit("abandoned").unwrap());
    let result = queue.enqueue("kept").await.unwrap();

    assert_eq!(result["n"], 2);
}
