use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Serialize;

use crate::application::ports::{FileLoader, LlmClient};
use crate::domain::{ContentType, Document};
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

const FILE_FIELD: &str = "file";

/// A fully buffered upload that has already been classified as PDF or DOCX.
pub struct UploadedFile {
    pub document: Document,
    pub data: Vec<u8>,
}

/// Reads the `file` part of a multipart body.
///
/// The media type is checked before the body is buffered so unsupported
/// uploads are rejected without reading them. Other parts are skipped.
pub async fn read_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadedFile, ApiError> {
    let limit_mb = max_bytes / (1024 * 1024);

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit_mb))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .filter(|name| !name.is_empty())
            .ok_or(ApiError::NoFileUploaded)?;
        let declared = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        tracing::debug!(filename = %filename, content_type = %declared, "Processing file upload");

        let content_type = ContentType::detect(Some(&declared), Some(&filename))
            .ok_or_else(|| ApiError::UnsupportedType(declared.clone()))?;

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, limit_mb))?
        {
            if data.len() + chunk.len() > max_bytes {
                return Err(ApiError::FileTooLarge { limit_mb });
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(ApiError::NoFileUploaded);
        }

        let document = Document::new(filename, content_type, data.len() as u64);
        tracing::info!(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
            kind = content_type.label(),
            size_bytes = document.size_bytes,
            "Upload received"
        );
        return Ok(UploadedFile { document, data });
    }

    Err(ApiError::NoFileUploaded)
}

fn multipart_error(error: MultipartError, limit_mb: usize) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::FileTooLarge { limit_mb }
    } else {
        ApiError::InvalidMultipart(error.body_text())
    }
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub text: String,
    pub total_chars: usize,
}

/// Extracts the upload and returns its opening text. The model is not called.
#[tracing::instrument(skip_all)]
pub async fn upload_handler<F, L>(
    State(state): State<AppState<F, L>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError>
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    let upload = read_upload(&mut multipart, state.settings.upload.max_file_size_bytes()).await?;
    let preview = state
        .analysis_service
        .preview(&upload.data, &upload.document)
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        filename: upload.document.filename,
        text: preview.text,
        total_chars: preview.total_chars,
    }))
}
