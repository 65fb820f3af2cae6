use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;

use crate::application::ports::{FileLoader, LlmClient};
use crate::application::services::{AnalysisKind, JsonObject};
use crate::presentation::handlers::error::ApiError;
use crate::presentation::handlers::upload::read_upload;
use crate::presentation::state::AppState;

/// The model's object with `success: true` merged in at the top level.
#[derive(Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: JsonObject,
}

impl AnalysisResponse {
    fn from_model(mut result: JsonObject) -> Self {
        result.remove("success");
        Self {
            success: true,
            result,
        }
    }
}

pub async fn insights_handler<F, L>(
    state: State<AppState<F, L>>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError>
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    run_analysis(AnalysisKind::Insights, state, multipart).await
}

pub async fn analyze_handler<F, L>(
    state: State<AppState<F, L>>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError>
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    run_analysis(AnalysisKind::Analysis, state, multipart).await
}

#[tracing::instrument(skip_all, fields(kind = kind.as_str()))]
async fn run_analysis<F, L>(
    kind: AnalysisKind,
    State(state): State<AppState<F, L>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError>
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    let upload = read_upload(&mut multipart, state.settings.upload.max_file_size_bytes()).await?;
    tracing::debug!(
        queue_depth = state.analysis_service.queue().depth(),
        "Submitting document for analysis"
    );

    let result = state
        .analysis_service
        .analyze(kind, &upload.data, &upload.document)
        .await?;

    Ok(Json(AnalysisResponse::from_model(result)))
}
