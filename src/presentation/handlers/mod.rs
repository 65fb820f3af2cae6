mod analyze;
pub mod error;
mod generate_content;
mod health;
mod upload;

pub use analyze::{AnalysisResponse, analyze_handler, insights_handler};
pub use error::{ApiError, ErrorResponse};
pub use generate_content::generate_content_handler;
pub use health::health_handler;
pub use upload::{UploadedFile, read_upload, upload_handler};
