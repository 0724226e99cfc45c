//! Application configuration assembled by the builder wizard.
//!
//! Every struct tolerates absent fields: the structural validator
//! ([`crate::validate()`]) reports missing required values, not the
//! deserializer. Optional values that are absent are skipped on
//! serialization so templates see them as undefined.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::appid::derive_app_id;

/// The complete input to chart generation.
///
/// # Examples
///
/// ```
/// use appbuilder_core::Configuration;
///
/// let config: Configuration = serde_json::from_str(
///     r#"{"metadata":{"name":"sample-app"},"docker":{"repository":"nginx"}}"#,
/// ).unwrap();
/// assert_eq!(config.docker.tag, "latest");
/// assert!(config.ports.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub docker: DockerImage,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub environment: Vec<EnvVar>,
    /// Required by the validator; optional here so incomplete drafts parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    #[serde(default)]
    pub probes: Probes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    /// Derived from `name` when absent. Never recomputed once present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appid: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_long: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<Maintainer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Default for Maintainer {
    fn default() -> Self {
        Self {
            name: "community".to_owned(),
            email: String::new(),
        }
    }
}

/// Store category shown in the Olares market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Utilities,
    Productivity,
    Social,
    Entertainment,
    Development,
    Communication,
    Blockchain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerImage {
    #[serde(default)]
    pub repository: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub pull_policy: PullPolicy,
}

impl Default for DockerImage {
    fn default() -> Self {
        Self {
            repository: String::new(),
            tag: default_tag(),
            pull_policy: PullPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullPolicy {
    Always,
    #[default]
    IfNotPresent,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub container_port: u32,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default, rename = "type")]
    pub kind: PortKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<Entrance>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    #[default]
    Web,
    Network,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrance {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub auth_level: AuthLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthLevel {
    Public,
    #[default]
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    #[serde(default)]
    pub pvc: PersistentVolume,
    #[serde(default = "AppMount::app_data")]
    pub app_data: AppMount,
    #[serde(default = "AppMount::app_cache")]
    pub app_cache: AppMount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolume {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_pvc_size")]
    pub size: String,
    #[serde(default = "default_pvc_mount")]
    pub mount_path: String,
    #[serde(default)]
    pub storage_class: String,
}

impl Default for PersistentVolume {
    fn default() -> Self {
        Self {
            enabled: false,
            size: default_pvc_size(),
            mount_path: default_pvc_mount(),
            storage_class: String::new(),
        }
    }
}

/// An Olares-managed host directory (`appData` / `appCache`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMount {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub mount_path: String,
}

impl AppMount {
    fn app_data() -> Self {
        Self {
            enabled: true,
            mount_path: "/appdata".to_owned(),
        }
    }

    fn app_cache() -> Self {
        Self {
            enabled: true,
            mount_path: "/appcache".to_owned(),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            pvc: PersistentVolume::default(),
            app_data: AppMount::app_data(),
            app_cache: AppMount::app_cache(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default = "default_env_type", rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Rendered as a masked `password` variable in the manifest.
    #[serde(default)]
    pub secret: bool,
    /// The user must supply a value at install time.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

impl Default for EnvVar {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: None,
            default: None,
            kind: default_env_type(),
            options: Vec::new(),
            secret: false,
            required: false,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub requests: ResourceAmounts,
    #[serde(default)]
    pub limits: ResourceAmounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAmounts {
    #[serde(default)]
    pub cpu: String,
    #[serde(default)]
    pub memory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probes {
    #[serde(default = "Probe::liveness")]
    pub liveness: Probe,
    #[serde(default = "Probe::readiness")]
    pub readiness: Probe,
}

impl Default for Probes {
    fn default() -> Self {
        Self {
            liveness: Probe::liveness(),
            readiness: Probe::readiness(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, rename = "type")]
    pub kind: ProbeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Name of a declared port. May dangle; templates skip the probe then.
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub initial_delay_seconds: u32,
    #[serde(default)]
    pub period_seconds: u32,
}

impl Probe {
    fn liveness() -> Self {
        Self {
            enabled: true,
            kind: ProbeKind::TcpSocket,
            path: None,
            port: String::new(),
            initial_delay_seconds: 30,
            period_seconds: 10,
        }
    }

    fn readiness() -> Self {
        Self {
            initial_delay_seconds: 10,
            period_seconds: 5,
            ..Self::liveness()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeKind {
    HttpGet,
    #[default]
    TcpSocket,
}

impl Configuration {
    /// Fill in the values the generator relies on: the appid derived from
    /// the name, and the `community` maintainer. Existing values are kept,
    /// so applying this twice is the same as applying it once.
    pub fn apply_defaults(&mut self) {
        if self.metadata.appid.as_deref().is_none_or(str::is_empty) {
            let appid = derive_app_id(&self.metadata.name);
            tracing::debug!(name = %self.metadata.name, %appid, "derived appid");
            self.metadata.appid = Some(appid);
        }
        if self.metadata.maintainer.is_none() {
            self.metadata.maintainer = Some(Maintainer::default());
        }
    }

    /// A defaulted copy; `self` is left untouched.
    pub fn with_defaults(&self) -> Self {
        let mut config = self.clone();
        config.apply_defaults();
        config
    }

    /// Read a configuration document (the wizard's JSON export).
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigurationRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&content).map_err(|e| crate::Error::ConfigurationParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Run the structural validator, turning its messages into an error.
    pub fn ensure_valid(&self) -> crate::Result<()> {
        let errors = crate::validate(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::Invalid(errors))
        }
    }

    /// Whether the conditional `templates/pvc.yaml` belongs in the chart.
    pub fn pvc_enabled(&self) -> bool {
        self.storage.pvc.enabled
    }
}

fn default_tag() -> String {
    "latest".to_owned()
}

fn default_pvc_size() -> String {
    "10Gi".to_owned()
}

fn default_pvc_mount() -> String {
    "/data".to_owned()
}

fn default_env_type() -> String {
    "string".to_owned()
}
