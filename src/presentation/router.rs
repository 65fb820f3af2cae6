use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{FileLoader, LlmClient};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    analyze_handler, generate_content_handler, health_handler, insights_handler, upload_handler,
};
use crate::presentation::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn create_router<F, L>(state: AppState<F, L>) -> Router
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let upload_limit =
        DefaultBodyLimit::max(state.settings.upload.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES);
    let json_limit = DefaultBodyLimit::max(state.settings.upload.max_json_body_bytes());

    let uploads = Router::new()
        .route("/api/insights", post(insights_handler::<F, L>))
        .route("/api/analyze", post(analyze_handler::<F, L>))
        .route("/api/upload", post(upload_handler::<F, L>))
        .layer(upload_limit);

    let generation = Router::new()
        .route(
            "/api/generate-content",
            post(generate_content_handler::<F, L>),
        )
        .layer(json_limit);

    Router::new()
        .route("/health", get(health_handler))
        .merge(uploads)
        .merge(generation)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
