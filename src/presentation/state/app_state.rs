use std::sync::Arc;

use crate::application::ports::{FileLoader, LlmClient};
use crate::application::services::{AnalysisService, ContentService};
use crate::presentation::config::Settings;

pub struct AppState<F: ?Sized, L: ?Sized>
where
    F: FileLoader,
    L: LlmClient,
{
    pub analysis_service: Arc<AnalysisService<F>>,
    pub content_service: Arc<ContentService<L>>,
    pub settings: Settings,
}

impl<F: ?Sized, L: ?Sized> Clone for AppState<F, L>
where
    F: FileLoader,
    L: LlmClient,
{
    fn clone(&self) -> Self {
        Self {
            analysis_service: Arc::clone(&self.analysis_service),
            content_service: Arc::clone(&self.content_service),
            settings: self.settings.clone(),
        }
    }
}
