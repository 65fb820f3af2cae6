use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: Environment,
    pub level: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn from_settings(environment: Environment, logging: &LoggingSettings) -> Self {
        Self {
            environment,
            level: logging.level.clone(),
            json_format: logging.enable_json,
        }
    }

    /// Directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        format!("{},insight_relay=debug,tower_http=debug", self.level)
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Local,
            level: "info".to_string(),
            json_format: false,
        }
    }
}
