mod analysis_service;
mod completion_queue;
mod content_service;
pub mod prompts;
mod response_normalizer;

pub use analysis_service::{AnalysisError, AnalysisKind, AnalysisService, DocumentPreview};
pub use completion_queue::{
    CompletionError, CompletionQueue, CompletionQueueConfig, CompletionWorker, PendingCompletion,
};
pub use content_service::{ContentError, ContentService, ContentServiceConfig};
pub use response_normalizer::{
    JsonObject, NormalizeError, NormalizedReply, ParseStrategy, normalize,
};
