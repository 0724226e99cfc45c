//! HTTP API for the Olares app builder.
//!
//! Serves the wizard backend: validation, chart generation and packaging,
//! GitHub repository inspection, saved projects and the preset catalog.
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/health` | GET | liveness |
//! | `/api/generate` | POST | validate and render every chart file |
//! | `/api/generate/package` | POST | validate, render and return the `.tar.gz` |
//! | `/api/generate/validate` | POST | dry run, `{valid, errors}` |
//! | `/api/github/analyze` | POST | inspect a repository |
//! | `/api/projects` | GET, POST | list / save projects |
//! | `/api/projects/import` | POST | import under a new id |
//! | `/api/projects/{id}` | GET, PUT, DELETE | one project |
//! | `/api/templates` | GET | preset catalog |
//! | `/api/templates/{id}` | GET | one preset |
//!
//! ```rust,no_run
//! use appbuilder_core::Settings;
//!
//! # async fn run() -> Result<(), appbuilder::ServeError> {
//! let settings = Settings::load_with_env(std::path::Path::new("appbuilder.toml"))?;
//! appbuilder::serve(settings).await
//! # }
//! ```

pub mod error;
pub mod presets;
pub mod routes;
pub mod state;
pub mod store;

use std::path::Path;

use appbuilder_core::Settings;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use presets::{Preset, preset, presets};
pub use state::{AppState, StateError};
pub use store::{FileProjectStore, MemoryProjectStore, Project, ProjectStore, ProjectSummary, StoreError};

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/generate", post(routes::generate))
        .route("/api/generate/package", post(routes::package))
        .route("/api/generate/validate", post(routes::validate_config))
        .route("/api/github/analyze", post(routes::analyze))
        .route(
            "/api/projects",
            get(routes::list_projects).post(routes::save_project),
        )
        .route("/api/projects/import", post(routes::import_project))
        .route(
            "/api/projects/{id}",
            get(routes::get_project)
                .put(routes::update_project)
                .delete(routes::delete_project),
        )
        .route("/api/templates", get(routes::list_presets))
        .route("/api/templates/{id}", get(routes::get_preset))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create `<data>/projects` and `<data>/temp`.
pub fn prepare_data_dirs(settings: &Settings) -> Result<(), StateError> {
    for dir in [settings.projects_dir(), settings.temp_dir()] {
        create_dir(&dir)?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), StateError> {
    std::fs::create_dir_all(path).map_err(|e| StateError::DataDir {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Run the API until Ctrl-C.
pub async fn serve(settings: Settings) -> Result<(), ServeError> {
    prepare_data_dirs(&settings)?;
    let state = AppState::from_settings(&settings)?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServeError::Bind {
            addr: addr.clone(),
            source: e,
        })?;

    tracing::info!(
        %addr,
        data_path = %settings.storage.data_path.display(),
        "app builder listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Serve)?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Settings(#[from] appbuilder_core::Error),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error")]
    Serve(#[source] std::io::Error),
}
