//! The fixed set of chart template resources.

use std::path::{Path, PathBuf};

use include_dir::{Dir, include_dir};

static EMBEDDED_TEMPLATES: Dir = include_dir!("$CARGO_MANIFEST_DIR/chart-templates");

/// Suffix of a template resource; the output path is the resource path
/// without it.
pub const TEMPLATE_SUFFIX: &str = ".j2";

/// Output path of every rendered chart file, in packaging order.
pub const REGISTRY: [&str; 10] = [
    "Chart.yaml",
    "OlaresManifest.yaml",
    "values.yaml",
    "README.md",
    ".helmignore",
    "templates/_helpers.tpl",
    "templates/deployment.yaml",
    "templates/service.yaml",
    "templates/pvc.yaml",
    "templates/NOTES.txt",
];

/// Output path of the conditional persistent volume claim.
pub const PVC_PATH: &str = "templates/pvc.yaml";

/// One template resource and the output path it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTemplate {
    pub path: &'static str,
    pub source: String,
}

/// All registry templates, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: Vec<ChartTemplate>,
}

impl TemplateStore {
    /// Templates compiled into the binary.
    pub fn embedded() -> Result<Self, StoreError> {
        let templates = REGISTRY
            .iter()
            .map(|&path| {
                let resource = resource_name(path);
                let file = EMBEDDED_TEMPLATES
                    .get_file(&resource)
                    .ok_or_else(|| StoreError::Missing {
                        resource: PathBuf::from(&resource),
                    })?;
                let source = file.contents_utf8().ok_or_else(|| StoreError::NotUtf8 {
                    resource: PathBuf::from(&resource),
                })?;
                Ok(ChartTemplate {
                    path,
                    source: source.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        tracing::debug!(count = templates.len(), "loaded embedded chart templates");
        Ok(Self { templates })
    }

    /// Templates read from `dir`, laid out like the embedded set
    /// (`Chart.yaml.j2`, `templates/deployment.yaml.j2`, ...).
    pub fn from_dir(dir: &Path) -> Result<Self, StoreError> {
        let templates = REGISTRY
            .iter()
            .map(|&path| {
                let resource = dir.join(resource_name(path));
                if !resource.is_file() {
                    return Err(StoreError::Missing { resource });
                }
                let source = std::fs::read_to_string(&resource).map_err(|e| StoreError::Read {
                    resource: resource.clone(),
                    source: e,
                })?;
                Ok(ChartTemplate { path, source })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        tracing::info!(dir = %dir.display(), count = templates.len(), "loaded chart templates");
        Ok(Self { templates })
    }

    /// Read from the override directory when one is configured, otherwise
    /// use the embedded templates.
    pub fn load(override_dir: Option<&Path>) -> Result<Self, StoreError> {
        match override_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&ChartTemplate> {
        self.templates.iter().find(|t| t.path == path)
    }

    /// Templates in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &ChartTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn resource_name(path: &str) -> String {
    format!("{path}{TEMPLATE_SUFFIX}")
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("chart template {resource} not found")]
    Missing { resource: PathBuf },
    #[error("chart template {resource} is not valid UTF-8")]
    NotUtf8 { resource: PathBuf },
    #[error("failed to read chart template {resource}")]
    Read {
        resource: PathBuf,
        source: std::io::Error,
    },
}
