use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use appbuilder_chart::{ChartBuilder, TemplateStore};
use appbuilder_core::Settings;
use appbuilder_inspect::RepoInspector;

use crate::store::{FileProjectStore, ProjectStore};

/// Shared, read-only services handed to every handler.
///
/// Cloning is cheap: everything sits behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<ChartBuilder>,
    pub projects: Arc<dyn ProjectStore>,
    pub inspector: Arc<RepoInspector>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("templates", &self.builder.store().len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        builder: ChartBuilder,
        projects: impl ProjectStore + 'static,
        inspector: RepoInspector,
    ) -> Self {
        Self {
            builder: Arc::new(builder),
            projects: Arc::new(projects),
            inspector: Arc::new(inspector),
        }
    }

    /// Build the production services: templates from the override
    /// directory (or the embedded set), projects under the data path, and a
    /// GitHub inspector.
    pub fn from_settings(settings: &Settings) -> Result<Self, StateError> {
        let templates = TemplateStore::load(settings.templates.dir.as_deref())?;
        tracing::debug!(
            templates = templates.len(),
            override_dir = ?settings.templates.dir,
            "chart templates loaded"
        );

        let projects = FileProjectStore::new(settings.projects_dir());
        let inspector = RepoInspector::from_settings(&settings.github)?;

        Ok(Self::new(
            ChartBuilder::new(Arc::new(templates)),
            projects,
            inspector,
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to load chart templates")]
    Templates(#[from] appbuilder_chart::StoreError),

    #[error("failed to set up the GitHub client")]
    Github(#[from] appbuilder_inspect::FetchError),

    #[error("failed to create data directory {path}")]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
