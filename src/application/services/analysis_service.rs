use std::sync::Arc;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::Document;

use super::completion_queue::{CompletionError, CompletionQueue};
use super::prompts::{analysis_prompt, insights_prompt};
use super::response_normalizer::JsonObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Insights,
    Analysis,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insights => "insights",
            Self::Analysis => "analysis",
        }
    }

    fn prompt(&self, document_text: &str) -> String {
        match self {
            Self::Insights => insights_prompt(document_text),
            Self::Analysis => analysis_prompt(document_text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPreview {
    pub text: String,
    pub total_chars: usize,
}

/// Turns uploaded documents into structured model output through the
/// completion queue.
pub struct AnalysisService<F: ?Sized> {
    file_loader: Arc<F>,
    queue: CompletionQueue,
    preview_chars: usize,
}

impl<F> AnalysisService<F>
where
    F: FileLoader + ?Sized,
{
    pub fn new(file_loader: Arc<F>, queue: CompletionQueue, preview_chars: usize) -> Self {
        Self {
            file_loader,
            queue,
            preview_chars,
        }
    }

    pub fn queue(&self) -> &CompletionQueue {
        &self.queue
    }

    #[tracing::instrument(
        skip(self, data),
        fields(document_id = %document.id.as_uuid(), filename = %document.filename)
    )]
    pub async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, AnalysisError> {
        let text = self.file_loader.extract_text(data, document).await?;

        if text.trim().is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()).into());
        }

        tracing::debug!(chars = text.len(), "Document text extracted");
        Ok(text)
    }

    /// Extracts the document and waits for the queued model reply.
    /// The result is all-or-nothing: any failure discards partial work.
    #[tracing::instrument(skip_all, fields(kind = kind.as_str()))]
    pub async fn analyze(
        &self,
        kind: AnalysisKind,
        data: &[u8],
        document: &Document,
    ) -> Result<JsonObject, AnalysisError> {
        let text = self.extract_text(data, document).await?;
        let result = self.queue.enqueue(kind.prompt(&text)).await?;

        tracing::info!(fields = result.len(), "Document analysis complete");
        Ok(result)
    }

    pub async fn generate_insights(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<JsonObject, AnalysisError> {
        self.analyze(AnalysisKind::Insights, data, document).await
    }

    pub async fn generate_analysis(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<JsonObject, AnalysisError> {
        self.analyze(AnalysisKind::Analysis, data, document).await
    }

    /// Extracts the document and returns its opening characters without
    /// contacting the model.
    pub async fn preview(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<DocumentPreview, AnalysisError> {
        let text = self.extract_text(data, document).await?;
        let total_chars = text.chars().count();
        let mut preview: String = text.chars().take(self.preview_chars).collect();
        preview.push_str("...");

        Ok(DocumentPreview {
            text: preview,
            total_chars,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("file extraction failed: {0}")]
    Extraction(#[from] FileLoaderError),
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
}
