use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load settings from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },

    // ── Configuration documents ──
    #[error("failed to read configuration from {path}")]
    ConfigurationRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration at {path}")]
    ConfigurationParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("configuration is invalid: {}", format_messages(.0))]
    Invalid(Vec<String>),
}

fn format_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        "(no details)".to_owned()
    } else {
        messages.join("; ")
    }
}
