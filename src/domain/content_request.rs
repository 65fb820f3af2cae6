use serde::Deserialize;

const MIN_TOPIC_CHARS: usize = 3;

/// Generation parameters as posted by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentRequest {
    pub content_type: String,
    pub topic: Option<String>,
    pub tactics: Vec<String>,
    pub tone: String,
    pub length: String,
    pub complexity: String,
    pub audience: String,
    pub keywords: String,
    pub examples: String,
    pub humor_level: String,
}

impl Default for ContentRequest {
    fn default() -> Self {
        Self {
            content_type: "strategy".to_string(),
            topic: None,
            tactics: Vec::new(),
            tone: "professional".to_string(),
            length: "medium".to_string(),
            complexity: "intermediate".to_string(),
            audience: "general business audience".to_string(),
            keywords: String::new(),
            examples: "yes".to_string(),
            humor_level: "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
    Extensive,
}

impl LengthBucket {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "short" => Self::Short,
            "long" => Self::Long,
            "extensive" => Self::Extensive,
            _ => Self::Medium,
        }
    }

    pub fn word_range(&self) -> &'static str {
        match self {
            Self::Short => "300-500 words",
            Self::Medium => "800-1200 words",
            Self::Long => "1500-2000 words",
            Self::Extensive => "2500+ words",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamplesPreference {
    Yes,
    No,
    Extensive,
}

impl ExamplesPreference {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "yes" => Self::Yes,
            "extensive" => Self::Extensive,
            _ => Self::No,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumorLevel {
    None,
    Moderate,
    Very,
    Extreme,
}

impl HumorLevel {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "moderate" => Self::Moderate,
            "very" => Self::Very,
            "extreme" => Self::Extreme,
            _ => Self::None,
        }
    }
}

/// A generation request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBrief {
    pub content_type: String,
    pub topic: String,
    pub tactics: Vec<String>,
    pub tone: String,
    pub length: LengthBucket,
    pub complexity: String,
    pub audience: String,
    pub keywords: String,
    pub examples: ExamplesPreference,
    pub humor: HumorLevel,
}

impl TryFrom<ContentRequest> for ContentBrief {
    type Error = ValidationError;

    fn try_from(request: ContentRequest) -> Result<Self, Self::Error> {
        let topic = request
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|t| t.chars().count() >= MIN_TOPIC_CHARS)
            .ok_or_else(|| {
                ValidationError::new(
                    "topic",
                    format!(
                        "Please provide a valid topic (at least {MIN_TOPIC_CHARS} characters)."
                    ),
                )
            })?
            .to_string();

        let tactics: Vec<String> = request
            .tactics
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if tactics.is_empty() {
            return Err(ValidationError::new(
                "tactics",
                "Please provide at least one valid tactical approach.",
            ));
        }

        Ok(Self {
            content_type: request.content_type,
            topic,
            tactics,
            tone: request.tone,
            length: LengthBucket::parse(&request.length),
            complexity: request.complexity,
            audience: request.audience.trim().to_string(),
            keywords: request.keywords.trim().to_string(),
            examples: ExamplesPreference::parse(&request.examples),
            humor: HumorLevel::parse(&request.humor_level),
        })
    }
}
