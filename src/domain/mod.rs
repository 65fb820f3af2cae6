mod chat_request;
mod content_request;
mod document;
mod message_role;

pub use chat_request::{ChatMessage, ChatRequest};
pub use content_request::{
    ContentBrief, ContentRequest, ExamplesPreference, HumorLevel, LengthBucket, ValidationError,
};
pub use document::{ContentType, Document, DocumentId};
pub use message_role::MessageRole;
