//! File-Set → gzip-compressed tar archive.
//!
//! Entries are written in packaging order under `<name>/`, as regular files
//! with mode 0644, uid/gid 0 and mtime 0. The gzip header carries mtime 0
//! too, so identical input always yields byte-identical archives.

use std::io::Write;

use appbuilder_core::Configuration;
use flate2::{Compression, GzBuilder};
use tar::{Builder, EntryType, Header};

use crate::generate::FileSet;
use crate::store::{PVC_PATH, REGISTRY};

const ENTRY_MODE: u32 = 0o644;

/// Paths that belong in the archive for `config`, in packaging order.
/// `templates/pvc.yaml` is only included when the PVC is enabled.
pub fn entry_paths(config: &Configuration) -> Vec<&'static str> {
    REGISTRY
        .iter()
        .copied()
        .filter(|&path| path != PVC_PATH || config.pvc_enabled())
        .collect()
}

/// `<name>-v<version>.tar.gz`
pub fn archive_file_name(config: &Configuration) -> String {
    format!("{}-v{}.tar.gz", config.metadata.name, config.metadata.version)
}

/// Build the chart archive for `files`.
pub fn package(files: &FileSet, config: &Configuration) -> Result<Vec<u8>, PackageError> {
    let name = &config.metadata.name;
    let gz = GzBuilder::new()
        .mtime(0)
        .write(Vec::new(), Compression::default());
    let mut archive = Builder::new(gz);

    let paths = entry_paths(config);
    for path in &paths {
        let Some(content) = files.get(path) else {
            tracing::error!(path, "file set is missing a packaged entry");
            return Err(PackageError::MissingEntry {
                path: (*path).to_owned(),
            });
        };
        let entry = format!("{name}/{path}");
        append_file(&mut archive, &entry, content.as_bytes())?;
    }

    let gz = archive.into_inner().map_err(|e| PackageError::Io {
        context: "finish tar stream",
        source: e,
    })?;
    let bytes = gz.finish().map_err(|e| PackageError::Io {
        context: "finish gzip stream",
        source: e,
    })?;

    tracing::debug!(%name, entries = paths.len(), bytes = bytes.len(), "packaged chart");
    Ok(bytes)
}

fn append_file<W: Write>(
    archive: &mut Builder<W>,
    entry: &str,
    content: &[u8],
) -> Result<(), PackageError> {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_size(content.len() as u64);
    header.set_mode(ENTRY_MODE);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);

    archive
        .append_data(&mut header, entry, content)
        .map_err(|e| PackageError::Entry {
            entry: entry.to_owned(),
            source: e,
        })
}

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("file set has no entry for {path}")]
    MissingEntry { path: String },
    #[error("failed to append {entry} to archive")]
    Entry {
        entry: String,
        source: std::io::Error,
    },
    #[error("failed to {context}")]
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pvc_entry_follows_toggle() {
        let mut config = Configuration::default();
        assert_eq!(entry_paths(&config).len(), 9);
        assert!(!entry_paths(&config).contains(&PVC_PATH));

        config.storage.pvc.enabled = true;
        let paths = entry_paths(&config);
        assert_eq!(paths.len(), 10);
        assert_eq!(paths[8], PVC_PATH);
    }

    #[test]
    fn archive_name_uses_name_and_version() {
        let mut config = Configuration::default();
        config.metadata.name = "sample-app".to_owned();
        config.metadata.version = "1.2.3".to_owned();
        assert_eq!(archive_file_name(&config), "sample-app-v1.2.3.tar.gz");
    }

    #[test]
    fn missing_entry_is_reported() {
        let files: FileSet = [("Chart.yaml", "name: x\n".to_owned())].into_iter().collect();
        let err = package(&files, &Configuration::default()).unwrap_err();
        match err {
            PackageError::MissingEntry { path } => assert_eq!(path, "OlaresManifest.yaml"),
            other => panic!("expected MissingEntry, got {other:?}"),
        }
    }
}
