mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    API_KEY_VARIABLE, LlmSettings, LoggingSettings, PORT_VARIABLE, ServerSettings, Settings,
    SettingsError, UploadSettings,
};
