use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use insight_relay::application::services::{
    AnalysisService, CompletionQueue, CompletionQueueConfig, ContentService, ContentServiceConfig,
};
use insight_relay::infrastructure::llm::create_chat_completion_client;
use insight_relay::infrastructure::observability::{TracingConfig, init_tracing};
use insight_relay::infrastructure::text_processing::CompositeFileLoader;
use insight_relay::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        &TracingConfig::from_settings(environment, &settings.logging),
        settings.server.port,
    );

    let llm_client = Arc::new(
        create_chat_completion_client(&settings.llm)
            .context("Failed to build chat completion client")?,
    );

    let queue = CompletionQueue::spawn(
        Arc::clone(&llm_client),
        CompletionQueueConfig {
            model: settings.llm.analysis_model.clone(),
            call_timeout: Duration::from_secs(settings.llm.request_timeout_seconds),
        },
    );

    let analysis_service = Arc::new(AnalysisService::new(
        Arc::new(CompositeFileLoader::with_default_adapters()),
        queue,
        settings.upload.preview_chars,
    ));

    let content_service = Arc::new(ContentService::new(
        Arc::clone(&llm_client),
        ContentServiceConfig {
            model: settings.llm.generation_model.clone(),
            max_tokens: settings.llm.generation_max_tokens,
        },
    ));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    tracing::info!(
        analysis_model = %settings.llm.analysis_model,
        generation_model = %settings.llm.generation_model,
        max_file_size_mb = settings.upload.max_file_size_mb,
        "Services initialized"
    );

    let state = AppState {
        analysis_service,
        content_service,
        settings,
    };

    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
