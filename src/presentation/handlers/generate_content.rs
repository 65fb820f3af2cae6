use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;

use crate::application::ports::{FileLoader, LlmClient};
use crate::domain::ContentRequest;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct GenerateContentResponse {
    pub success: bool,
    pub content: String,
}

#[tracing::instrument(skip_all)]
pub async fn generate_content_handler<F, L>(
    State(state): State<AppState<F, L>>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<GenerateContentResponse>, ApiError>
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let content = state.content_service.generate(request).await?;

    Ok(Json(GenerateContentResponse {
        success: true,
        content,
    }))
}
