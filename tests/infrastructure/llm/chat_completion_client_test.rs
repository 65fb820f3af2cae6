use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use insight_relay::application::ports::{LlmClient, LlmClientError};
use insight_relay::application::services::prompts::json_completion_request;
use insight_relay::application::services::{
    CompletionError, CompletionQueue, CompletionQueueConfig,
};
use insight_relay::infrastructure::llm::ChatCompletionClient;

#[derive(Default)]
struct Captured {
    authorization: Option<String>,
    body: Option<serde_json::Value>,
}

async fn start_mock_completion_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, Arc<Mutex<Captured>>, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captured = Arc::new(Mutex::new(Captured::default()));
    let sink = Arc::clone(&captured);

    let app = Router::new().route(
        "/chat/completions",
        post(move |headers: HeaderMap, body: String| {
            let sink = Arc::clone(&sink);
            async move {
                let mut captured = sink.lock().unwrap();
                captured.authorization = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                captured.body = serde_json::from_str(&body).ok();

                let status = StatusCode::from_u16(response_status).unwrap();
                (
                    status,
                    [(axum::http::header::CONTENT_TYPE, "application/json")],
                    response_body,
                )
                    .into_response()
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, captured, shutdown_tx)
}

async fn start_stalled_completion_server(stall: Duration) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/chat/completions",
        post(move || async move {
            tokio::time::sleep(stall).await;
            (
                StatusCode::OK,
                r#"{"choices":[{"message":{"content":"{}"}}]}"#,
            )
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (format!("http://{}", addr), shutdown_tx)
}

fn client_for(base_url: &str) -> ChatCompletionClient {
    ChatCompletionClient::new(base_url, "test-key", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn given_successful_reply_when_completing_then_returns_first_choice_content() {
    let response_body = r#"{"choices":[{"message":{"role":"assistant","content":"  {\"ok\":true}  "}}]}"#;
    let (base_url, captured, shutdown_tx) = start_mock_completion_server(200, response_body).await;
    let client = client_for(&base_url);

    let result = client
        .complete(&json_completion_request("test-model", "Summarize this"))
        .await;

    assert_eq!(result.unwrap(), r#"{"ok":true}"#);

    let captured = captured.lock().unwrap();
    assert_eq!(captured.authorization.as_deref(), Some("Bearer test-key"));
    let body = captured.body.as_ref().unwrap();
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "Summarize this");
    assert!(body.get("max_tokens").is_none());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_error_status_when_completing_then_returns_api_error_with_body() {
    let response_body = r#"{"error":{"message":"rate limited"}}"#;
    let (base_url, _captured, shutdown_tx) = start_mock_completion_server(429, response_body).await;
    let client = client_for(&base_url);

    let result = client
        .complete(&json_completion_request("test-model", "prompt"))
        .await;

    assert!(matches!(
        result,
        Err(LlmClientError::Api { status: 429, ref body }) if body.contains("rate limited")
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_choices_when_completing_then_returns_empty_completion() {
    let (base_url, _captured, shutdown_tx) =
        start_mock_completion_server(200, r#"{"choices":[]}"#).await;
    let client = client_for(&base_url);

    let result = client
        .complete(&json_completion_request("test-model", "prompt"))
        .await;

    assert!(matches!(result, Err(LlmClientError::EmptyCompletion)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_json_body_when_completing_then_returns_invalid_response() {
    let (base_url, _captured, shutdown_tx) =
        start_mock_completion_server(200, "<html>gateway</html>").await;
    let client = client_for(&base_url);

    let result = client
        .complete(&json_completion_request("test-model", "prompt"))
        .await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_host_when_completing_then_returns_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client_for(&format!("http://{}", addr));

    let result = client
        .complete(&json_completion_request("test-model", "prompt"))
        .await;

    assert!(matches!(result, Err(LlmClientError::Transport(_))));
}

#[tokio::test]
async fn given_stalled_server_when_completing_then_returns_timeout_error() {
    let (base_url, shutdown_tx) = start_stalled_completion_server(Duration::from_secs(30)).await;
    let client =
        ChatCompletionClient::new(&base_url, "test-key", Duration::from_millis(200)).unwrap();

    let result = client
        .complete(&json_completion_request("test-model", "prompt"))
        .await;

    assert!(matches!(
        result,
        Err(LlmClientError::Timeout(after)) if after == Duration::from_millis(200)
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_stalled_server_and_matching_timeouts_when_enqueuing_then_every_item_times_out() {
    let (base_url, shutdown_tx) = start_stalled_completion_server(Duration::from_secs(30)).await;
    let call_timeout = Duration::from_millis(300);
    let client = Arc::new(ChatCompletionClient::new(&base_url, "test-key", call_timeout).unwrap());
    let queue = CompletionQueue::spawn(
        client,
        CompletionQueueConfig {
            model: "test-model".to_string(),
            call_timeout,
        },
    );

    let pending: Vec<_> = (0..6)
        .map(|i| queue.submit(format!("prompt {i}")).unwrap())
        .collect();

    for completion in pending {
        let result = completion.wait().await;
        assert!(
            matches!(result, Err(CompletionError::Timeout(_))),
            "expected timeout, got {result:?}"
        );
    }
    shutdown_tx.send(()).ok();
}
