//! Saved wizard projects.
//!
//! A project is the wizard's JSON document, kept as-is (drafts may be
//! incomplete) plus bookkeeping fields: `projectId`, `createdAt`,
//! `updatedAt` and `version`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

pub type Project = Map<String, Value>;

pub const PROJECT_ID: &str = "projectId";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";
pub const FORMAT_VERSION: &str = "version";
pub const DEFAULT_FORMAT_VERSION: &str = "1.0";

/// One row of the project list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub title: String,
    pub version: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectSummary {
    fn from_project(project: &Project) -> Option<Self> {
        let text = |value: Option<&Value>| value.and_then(Value::as_str).unwrap_or_default().to_owned();
        let metadata = project.get("metadata");
        let id = project.get(PROJECT_ID).and_then(Value::as_str)?;
        Some(Self {
            id: id.to_owned(),
            name: text(metadata.and_then(|m| m.get("name"))),
            title: text(metadata.and_then(|m| m.get("title"))),
            version: text(metadata.and_then(|m| m.get("version"))),
            created_at: text(project.get(CREATED_AT)),
            updated_at: text(project.get(UPDATED_AT)),
        })
    }
}

/// Persistence for saved projects.
///
/// Implementors provide raw record access; the provided methods add ids,
/// timestamps and the format version. Calls block, so async callers should
/// run them on a blocking thread.
pub trait ProjectStore: Send + Sync {
    /// Ids of every stored record. Order is unspecified.
    fn ids(&self) -> Result<Vec<String>, StoreError>;

    fn read(&self, id: &str) -> Result<Project, StoreError>;

    /// Create or replace the record for `id`.
    fn write(&self, id: &str, project: &Project) -> Result<(), StoreError>;

    fn remove(&self, id: &str) -> Result<(), StoreError>;

    fn exists(&self, id: &str) -> Result<bool, StoreError>;

    /// Summaries of all readable projects, most recently updated first.
    /// Unreadable records are skipped.
    fn list(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        let mut summaries = Vec::new();
        for id in self.ids()? {
            match self.read(&id) {
                Ok(project) => match ProjectSummary::from_project(&project) {
                    Some(summary) => summaries.push(summary),
                    None => tracing::warn!(%id, "skipping project without projectId"),
                },
                Err(e) => tracing::warn!(%id, error = %e, "skipping unreadable project"),
            }
        }
        summaries.sort_by(|a, b| {
            parse_timestamp(&b.updated_at)
                .cmp(&parse_timestamp(&a.updated_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(summaries)
    }

    fn get(&self, id: &str) -> Result<Project, StoreError> {
        check_id(id)?;
        self.read(id)
    }

    /// Save a project, assigning an id (and creation time) when it has
    /// none. Returns the id.
    fn create_or_update(&self, mut project: Project) -> Result<String, StoreError> {
        let now = timestamp();
        let id = match project.get(PROJECT_ID).and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {
                check_id(id)?;
                id.to_owned()
            }
            _ => {
                let id = new_id();
                project.insert(PROJECT_ID.to_owned(), Value::from(id.as_str()));
                project.insert(CREATED_AT.to_owned(), Value::from(now.as_str()));
                id
            }
        };
        project.insert(UPDATED_AT.to_owned(), Value::from(now));
        ensure_format_version(&mut project);

        self.write(&id, &project)?;
        tracing::info!(%id, "project saved");
        Ok(id)
    }

    /// Replace an existing project.
    fn update(&self, id: &str, mut project: Project) -> Result<(), StoreError> {
        check_id(id)?;
        if !self.exists(id)? {
            return Err(StoreError::NotFound { id: id.to_owned() });
        }
        project.insert(PROJECT_ID.to_owned(), Value::from(id));
        project.insert(UPDATED_AT.to_owned(), Value::from(timestamp()));
        ensure_format_version(&mut project);

        self.write(id, &project)?;
        tracing::info!(%id, "project updated");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        check_id(id)?;
        self.remove(id)?;
        tracing::info!(%id, "project deleted");
        Ok(())
    }

    /// Store a copy of an exported project under a fresh id.
    fn import(&self, mut project: Project) -> Result<String, StoreError> {
        let id = new_id();
        let now = timestamp();
        project.insert(PROJECT_ID.to_owned(), Value::from(id.as_str()));
        project.insert(CREATED_AT.to_owned(), Value::from(now.as_str()));
        project.insert(UPDATED_AT.to_owned(), Value::from(now));
        ensure_format_version(&mut project);

        self.write(&id, &project)?;
        tracing::info!(%id, "project imported");
        Ok(id)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        // arch-lint: allow(no-silent-result-drop) reason="projects with a malformed updatedAt sort last"
        .ok()
}

fn ensure_format_version(project: &mut Project) {
    let missing = project
        .get(FORMAT_VERSION)
        .is_none_or(|v| v.is_null() || v.as_str() == Some(""));
    if missing {
        project.insert(FORMAT_VERSION.to_owned(), Value::from(DEFAULT_FORMAT_VERSION));
    }
}

/// Ids become file names: only ASCII letters, digits, `-` and `_`.
fn check_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id.len() <= 128
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId { id: id.to_owned() })
    }
}

// ── File store ──

/// One pretty-printed `<id>.json` file per project.
#[derive(Debug, Clone)]
pub struct FileProjectStore {
    dir: PathBuf,
}

impl FileProjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the projects directory if needed.
    pub fn init(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io {
            path: self.dir.clone(),
            source: e,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl ProjectStore for FileProjectStore {
    fn ids(&self) -> Result<Vec<String>, StoreError> {
        self.init()?;
        let entries = std::fs::read_dir(&self.dir).map_err(|e| StoreError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                ids.push(stem.to_owned());
            }
        }
        Ok(ids)
    }

    fn read(&self, id: &str) -> Result<Project, StoreError> {
        let path = self.path(id);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { id: id.to_owned() });
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        match serde_json::from_str(&content) {
            Ok(Value::Object(project)) => Ok(project),
            Ok(_) => Err(StoreError::NotAnObject { path }),
            Err(e) => Err(StoreError::Json { path, source: e }),
        }
    }

    fn write(&self, id: &str, project: &Project) -> Result<(), StoreError> {
        self.init()?;
        let path = self.path(id);
        let json = serde_json::to_string_pretty(project).map_err(|e| StoreError::Json {
            path: path.clone(),
            source: e,
        })?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| StoreError::Io { path, source: e })
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        let path = self.path(id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { id: id.to_owned() })
            }
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.path(id).is_file())
    }
}

// ── In-memory store ──

/// Keeps projects in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: Mutex<BTreeMap<String, Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn projects(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Project>> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProjectStore for MemoryProjectStore {
    fn ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.projects().keys().cloned().collect())
    }

    fn read(&self, id: &str) -> Result<Project, StoreError> {
        self.projects()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_owned() })
    }

    fn write(&self, id: &str, project: &Project) -> Result<(), StoreError> {
        self.projects().insert(id.to_owned(), project.clone());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.projects()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound { id: id.to_owned() })
    }

    fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.projects().contains_key(id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Project not found")]
    NotFound { id: String },

    #[error("invalid project id {id:?}")]
    InvalidId { id: String },

    #[error("project store I/O failed at {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("project file {path} is not valid JSON")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("project file {path} does not hold a JSON object")]
    NotAnObject { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(value: Value) -> Project {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn save_assigns_id_and_stamps() {
        let store = MemoryProjectStore::new();
        let id = store.create_or_update(project(json!({"metadata": {"name": "a"}}))).unwrap();

        let saved = store.get(&id).unwrap();
        assert_eq!(saved[PROJECT_ID], json!(id));
        assert_eq!(saved[FORMAT_VERSION], json!("1.0"));
        assert!(saved[CREATED_AT].is_string());
        assert!(parse_timestamp(saved[UPDATED_AT].as_str().unwrap()).is_some());
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn save_with_id_keeps_creation_time() {
        let store = MemoryProjectStore::new();
        let id = store.create_or_update(project(json!({}))).unwrap();
        let mut first = store.get(&id).unwrap();
        first.insert("note".into(), json!("edited"));
        first.insert(FORMAT_VERSION.into(), json!("2.0"));

        let again = store.create_or_update(first.clone()).unwrap();
        assert_eq!(again, id);
        let second = store.get(&id).unwrap();
        assert_eq!(second[CREATED_AT], first[CREATED_AT]);
        assert_eq!(second["note"], json!("edited"));
        assert_eq!(second[FORMAT_VERSION], json!("2.0"));
    }

    #[test]
    fn update_requires_existing_project() {
        let store = MemoryProjectStore::new();
        let err = store.update("missing", project(json!({}))).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn update_forces_path_id() {
        let store = MemoryProjectStore::new();
        let id = store.create_or_update(project(json!({}))).unwrap();
        store
            .update(&id, project(json!({"projectId": "other", "x": 1})))
            .unwrap();
        let saved = store.get(&id).unwrap();
        assert_eq!(saved[PROJECT_ID], json!(id));
        assert_eq!(saved["x"], json!(1));
        assert!(!store.exists("other").unwrap());
    }

    #[test]
    fn import_always_gets_a_new_id() {
        let store = MemoryProjectStore::new();
        let original = store.create_or_update(project(json!({"metadata": {"name": "a"}}))).unwrap();
        let exported = store.get(&original).unwrap();

        let imported = store.import(exported).unwrap();
        assert_ne!(imported, original);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn list_is_newest_first() {
        let store = MemoryProjectStore::new();
        for (id, updated) in [
            ("old", "2024-01-01T00:00:00.000Z"),
            ("new", "2025-06-01T00:00:00.000Z"),
            ("mid", "2024-12-31T23:59:59.000Z"),
        ] {
            store
                .write(
                    id,
                    &project(json!({"projectId": id, "updatedAt": updated,
                                     "metadata": {"name": id, "title": id, "version": "1.0.0"}})),
                )
                .unwrap();
        }

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["new", "mid", "old"]);
    }

    #[test]
    fn ids_are_restricted_to_file_safe_characters() {
        let store = MemoryProjectStore::new();
        for bad in ["", "../etc/passwd", "a/b", "a b", "x.json"] {
            assert!(matches!(store.get(bad), Err(StoreError::InvalidId { .. })), "{bad:?}");
        }
        assert!(matches!(store.get("ok-id_1"), Err(StoreError::NotFound { .. })));
    }
}
