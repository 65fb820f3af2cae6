use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

static BRACED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("braced span pattern is valid"));

/// Which stage recovered the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Direct,
    Extracted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReply {
    pub object: JsonObject,
    pub strategy: ParseStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("no JSON object found in model output")]
    NoJsonObject,
    #[error("invalid JSON in model output even after fallback: {0}")]
    InvalidJson(String),
}

/// Recovers a JSON object from a model reply.
///
/// The reply is parsed as-is first. When that fails, or yields something other
/// than an object, the span from the first `{` to the last `}` is parsed
/// instead. Replies holding several objects are not disambiguated: the span
/// covers all of them and usually fails to parse.
pub fn normalize(raw: &str) -> Result<NormalizedReply, NormalizeError> {
    let trimmed = raw.trim();

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(NormalizedReply {
            object,
            strategy: ParseStrategy::Direct,
        });
    }

    tracing::debug!("Direct JSON parse failed, scanning for a braced span");

    let span = BRACED_SPAN
        .find(trimmed)
        .ok_or(NormalizeError::NoJsonObject)?;

    serde_json::from_str::<JsonObject>(span.as_str())
        .map(|object| NormalizedReply {
            object,
            strategy: ParseStrategy::Extracted,
        })
        .map_err(|e| NormalizeError::InvalidJson(e.to_string()))
}
