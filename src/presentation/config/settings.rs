use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;

use super::Environment;

/// Legacy variable names honoured on top of the `APP__` prefixed ones.
pub const API_KEY_VARIABLE: &str = "GROQ_API_KEY";
pub const PORT_VARIABLE: &str = "PORT";

const MB: usize = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub upload: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub analysis_model: String,
    pub generation_model: String,
    pub generation_max_tokens: u32,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_file_size_mb: usize,
    pub max_json_body_mb: usize,
    pub preview_chars: usize,
}

impl UploadSettings {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * MB
    }

    pub fn max_json_body_bytes(&self) -> usize {
        self.max_json_body_mb * MB
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("GROQ_API_KEY (or APP__LLM__API_KEY) is not set")]
    MissingApiKey,
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl Settings {
    /// Loads defaults, then `appsettings.{env}.toml`, then `APP__*` variables,
    /// then the legacy `GROQ_API_KEY` / `PORT` variables.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        Self::load_with_overrides(
            environment,
            std::env::var(API_KEY_VARIABLE).ok(),
            std::env::var(PORT_VARIABLE).ok(),
        )
    }

    /// `load` with the legacy variables supplied by the caller.
    pub fn load_with_overrides(
        environment: Environment,
        api_key: Option<String>,
        port: Option<String>,
    ) -> Result<Self, SettingsError> {
        let builder = Self::defaults()?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("llm.api_key", api_key)?
            .set_override_option("server.port", port)?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("llm.api_key", "")?
            .set_default("llm.analysis_model", "llama-3.3-70b-versatile")?
            .set_default("llm.generation_model", "llama-3.3-70b-versatile")?
            .set_default("llm.generation_max_tokens", 8000)?
            .set_default("llm.request_timeout_seconds", 120)?
            .set_default("upload.max_file_size_mb", 25)?
            .set_default("upload.max_json_body_mb", 50)?
            .set_default("upload.preview_chars", 500)?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(SettingsError::MissingApiKey);
        }
        if self.llm.request_timeout_seconds == 0 {
            return Err(SettingsError::Invalid {
                field: "llm.request_timeout_seconds",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.upload.max_file_size_mb == 0 {
            return Err(SettingsError::Invalid {
                field: "upload.max_file_size_mb",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
