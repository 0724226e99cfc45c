//! Request handlers.

use std::sync::Arc;

use appbuilder_chart::{FileSet, archive_file_name};
use appbuilder_core::{Configuration, validate};
use appbuilder_inspect::RepositoryAnalysis;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ApiError, error_chain};
use crate::presets::{self, Preset};
use crate::state::AppState;
use crate::store::{Project, ProjectStore, ProjectSummary, StoreError};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

// ── Generation ──

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub files: FileSet,
    pub appid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

fn ensure_valid(config: &Configuration) -> Result<(), ApiError> {
    let errors = validate(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub async fn generate(
    State(state): State<AppState>,
    Json(config): Json<Configuration>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_valid(&config)?;
    let chart = state.builder.generate(&config)?;
    tracing::info!(name = %chart.config.metadata.name, appid = chart.appid(), "chart generated");

    Ok(Json(GenerateResponse {
        success: true,
        appid: chart.appid().to_owned(),
        files: chart.files,
    }))
}

pub async fn package(
    State(state): State<AppState>,
    Json(config): Json<Configuration>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_valid(&config)?;
    let (chart, archive) = state.builder.build(&config)?;
    let file_name = archive_file_name(&chart.config);
    tracing::info!(file = %file_name, bytes = archive.len(), "chart packaged");

    Ok((
        [
            (header::CONTENT_TYPE, "application/gzip".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        archive,
    ))
}

/// Dry run: validation, then a full generation whose failure or unparseable
/// YAML output is reported as validation messages.
pub async fn validate_config(
    State(state): State<AppState>,
    Json(config): Json<Configuration>,
) -> Json<ValidateResponse> {
    let errors = validate(&config);
    if !errors.is_empty() {
        return Json(ValidateResponse { valid: false, errors });
    }
    let errors = match state.builder.generate(&config) {
        Ok(chart) => chart.yaml_errors(),
        Err(e) => {
            tracing::warn!(error = %error_chain(&e), "dry-run generation failed");
            vec![e.to_string()]
        }
    };
    Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    })
}

// ── Repository inspection ──

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<RepositoryAnalysis>, ApiError> {
    let url = request.repo_url.as_deref().unwrap_or_default();
    let analysis = state.inspector.analyze(url, request.branch.as_deref()).await?;
    Ok(Json(analysis))
}

// ── Projects ──

/// Run a project store call on the blocking pool.
async fn with_store<T, F>(state: &AppState, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn ProjectStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.projects);
    let result = tokio::task::spawn_blocking(move || call(store.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("project store task failed: {e}")))?;
    Ok(result?)
}

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSaved {
    pub success: bool,
    pub project_id: String,
    pub message: &'static str,
}

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<ProjectList>, ApiError> {
    let projects = with_store(&state, |store| store.list()).await?;
    Ok(Json(ProjectList { projects }))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = with_store(&state, move |store| store.get(&id)).await?;
    Ok(Json(project))
}

pub async fn save_project(
    State(state): State<AppState>,
    Json(project): Json<Project>,
) -> Result<Json<ProjectSaved>, ApiError> {
    let project_id = with_store(&state, move |store| store.create_or_update(project)).await?;
    Ok(Json(ProjectSaved {
        success: true,
        project_id,
        message: "Project saved successfully",
    }))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(project): Json<Project>,
) -> Result<Json<ProjectSaved>, ApiError> {
    let project_id = id.clone();
    with_store(&state, move |store| store.update(&id, project)).await?;
    Ok(Json(ProjectSaved {
        success: true,
        project_id,
        message: "Project updated successfully",
    }))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    with_store(&state, move |store| store.delete(&id)).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Project deleted successfully",
    })))
}

pub async fn import_project(
    State(state): State<AppState>,
    Json(project): Json<Project>,
) -> Result<Json<ProjectSaved>, ApiError> {
    let project_id = with_store(&state, move |store| store.import(project)).await?;
    Ok(Json(ProjectSaved {
        success: true,
        project_id,
        message: "Project imported successfully",
    }))
}

// ── Presets ──

#[derive(Debug, Serialize)]
pub struct PresetList {
    pub templates: Vec<Preset>,
}

pub async fn list_presets() -> Json<PresetList> {
    Json(PresetList {
        templates: presets::presets(),
    })
}

pub async fn get_preset(Path(id): Path<String>) -> Result<Json<Preset>, ApiError> {
    presets::preset(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Template not found".to_owned()))
}
