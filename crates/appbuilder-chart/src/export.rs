use std::path::{Path, PathBuf};

use appbuilder_core::Configuration;

use crate::generate::FileSet;
use crate::package::entry_paths;

/// Write the chart into `<out_dir>/<name>/`, with the same entries the
/// archive would contain.
///
/// Refuses to touch an existing chart directory.
pub fn write_chart(
    files: &FileSet,
    config: &Configuration,
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let chart_dir = out_dir.join(&config.metadata.name);
    if chart_dir.exists() {
        return Err(ExportError::AlreadyExists(chart_dir));
    }

    for path in entry_paths(config) {
        let content = files.get(path).ok_or_else(|| ExportError::MissingEntry {
            path: path.to_owned(),
        })?;
        let target = chart_dir.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExportError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&target, content).map_err(|e| ExportError::Write {
            path: target.clone(),
            source: e,
        })?;
    }

    tracing::info!(dir = %chart_dir.display(), "wrote chart");
    Ok(chart_dir)
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("chart directory {0} already exists; remove it to regenerate")]
    AlreadyExists(PathBuf),
    #[error("file set has no entry for {path}")]
    MissingEntry { path: String },
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
