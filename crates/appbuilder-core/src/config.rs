use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Default settings file name, looked up in the working directory.
pub const SETTINGS_FILE: &str = "appbuilder.toml";

/// appbuilder.toml configuration for the builder service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub templates: TemplateSettings,
    #[serde(default)]
    pub github: GithubSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port (overridden by `PORT`)
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Root for saved projects and scratch files (overridden by `DATA_PATH`)
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Read chart templates from this directory instead of the embedded set
    /// (overridden by `APPBUILDER_TEMPLATES_DIR`).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubSettings {
    /// REST API base URL
    #[serde(default = "default_github_api")]
    pub api_url: String,
    /// Branch inspected when the request names none
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// API token, only ever read from `GITHUB_TOKEN`.
    #[serde(skip)]
    pub token: Option<SecretString>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_url: default_github_api(),
            default_branch: default_branch(),
            token: None,
        }
    }
}

impl Settings {
    /// Load from the given settings file, or return defaults if not found.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
                path: path.to_path_buf(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            tracing::debug!(path = %path.display(), "no settings file; using defaults");
            Ok(Self::default())
        }
    }

    /// Load settings, then apply `.env` and process environment overrides.
    pub fn load_with_env(path: &Path) -> crate::Result<Self> {
        let dotenv_loaded = dotenvy::dotenv().is_ok();
        tracing::debug!(dotenv = dotenv_loaded, "loading settings");

        let mut settings = Self::load(path)?;
        settings.apply_overrides(|key| {
            // arch-lint: allow(no-silent-result-drop) reason="an unset or non-UTF-8 variable means no override"
            std::env::var(key).ok()
        })?;
        Ok(settings)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production, a map in tests). Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|_| crate::Error::InvalidSetting {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(path) = get("DATA_PATH") {
            self.storage.data_path = PathBuf::from(path);
        }
        if let Some(dir) = get("APPBUILDER_TEMPLATES_DIR") {
            self.templates.dir = Some(PathBuf::from(dir));
        }
        if let Some(token) = get("GITHUB_TOKEN") {
            self.github.token = Some(SecretString::from(token));
        }

        tracing::debug!(
            port = self.server.port,
            data_path = %self.storage.data_path.display(),
            templates_dir = ?self.templates.dir,
            github_token_configured = self.github.token.is_some(),
            "settings resolved"
        );
        Ok(())
    }

    /// Directory holding one JSON file per saved project.
    pub fn projects_dir(&self) -> PathBuf {
        self.storage.data_path.join("projects")
    }

    /// Scratch directory for transient artifacts.
    pub fn temp_dir(&self) -> PathBuf {
        self.storage.data_path.join("temp")
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    3000
}

fn default_data_path() -> PathBuf {
    PathBuf::from("/appdata")
}

fn default_github_api() -> String {
    "https://api.github.com".to_owned()
}

fn default_branch() -> String {
    "main".to_owned()
}
