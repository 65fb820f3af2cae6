use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{FileLoaderError, LlmClientError};
use crate::application::services::{AnalysisError, CompletionError, ContentError};
use crate::domain::ValidationError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

/// Every failure the HTTP surface can report. Client mistakes map to 4xx,
/// model API trouble to 5xx.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("Failed to read upload: {0}")]
    InvalidMultipart(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("File exceeds the {limit_mb} MB upload limit")]
    FileTooLarge { limit_mb: usize },
    #[error("Unsupported file type: {0}. Only PDF and DOCX are supported.")]
    UnsupportedType(String),
    #[error("No readable text found in {0}. It might be empty, image-only or corrupted.")]
    NoReadableText(String),
    #[error("Failed to extract text: {0}")]
    ExtractionFailed(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Model API returned {status}: {body}")]
    RemoteApi { status: u16, body: String },
    #[error("Model output was not valid JSON: {0}")]
    MalformedModelOutput(String),
    #[error("Could not reach the model API: {0}")]
    Transport(String),
    #[error("Model API did not answer in time: {0}")]
    Timeout(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFileUploaded
            | Self::InvalidMultipart(_)
            | Self::InvalidBody(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NoReadableText(_) | Self::ExtractionFailed(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::RemoteApi { .. } | Self::MalformedModelOutput(_) | Self::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Short label for the `error` field.
    pub fn label(&self) -> String {
        match self {
            Self::NoFileUploaded => "No file uploaded".to_string(),
            Self::InvalidMultipart(_) => "Invalid upload".to_string(),
            Self::InvalidBody(_) => "Invalid request body".to_string(),
            Self::FileTooLarge { .. } => "File too large".to_string(),
            Self::UnsupportedType(_) => "Unsupported file type".to_string(),
            Self::NoReadableText(_) => "No readable text".to_string(),
            Self::ExtractionFailed(_) => "File extraction failed".to_string(),
            Self::Validation(e) => format!("Invalid {}", e.field),
            Self::RemoteApi { .. } => "Model API error".to_string(),
            Self::MalformedModelOutput(_) => "Malformed model output".to_string(),
            Self::Transport(_) => "Model API unreachable".to_string(),
            Self::Timeout(_) => "Model API timeout".to_string(),
            Self::Unavailable(_) => "Service unavailable".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.label(),
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<FileLoaderError> for ApiError {
    fn from(error: FileLoaderError) -> Self {
        match error {
            FileLoaderError::UnsupportedContentType(mime) => Self::UnsupportedType(mime),
            FileLoaderError::NoTextFound(name) => Self::NoReadableText(name),
            FileLoaderError::ExtractionFailed(msg) => Self::ExtractionFailed(msg),
        }
    }
}

impl From<LlmClientError> for ApiError {
    fn from(error: LlmClientError) -> Self {
        match error {
            LlmClientError::Api { status, body } => Self::RemoteApi { status, body },
            LlmClientError::Transport(msg) => Self::Transport(msg),
            LlmClientError::Timeout(after) => Self::Timeout(format!("gave up after {after:?}")),
            LlmClientError::InvalidResponse(msg) => Self::MalformedModelOutput(msg),
            LlmClientError::EmptyCompletion => {
                Self::MalformedModelOutput("model returned no content".to_string())
            }
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(error: CompletionError) -> Self {
        match error {
            CompletionError::Remote { status, body } => Self::RemoteApi { status, body },
            CompletionError::Transport(msg) => Self::Transport(msg),
            CompletionError::InvalidResponse(msg) => Self::MalformedModelOutput(msg),
            CompletionError::MalformedOutput(e) => Self::MalformedModelOutput(e.to_string()),
            CompletionError::Timeout(after) => Self::Timeout(format!("gave up after {after:?}")),
            CompletionError::QueueClosed => {
                Self::Unavailable("completion queue is closed".to_string())
            }
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::Extraction(e) => e.into(),
            AnalysisError::Completion(e) => e.into(),
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(error: ContentError) -> Self {
        match error {
            ContentError::Validation(e) => e.into(),
            ContentError::Generation(e) => e.into(),
        }
    }
}
