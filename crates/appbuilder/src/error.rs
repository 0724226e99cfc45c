use std::error::Error as StdError;

use appbuilder_chart::{BuildError, GenerateError, PackageError};
use appbuilder_inspect::InspectError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::store::StoreError;

/// Failure of an API request, rendered as a JSON error body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configuration failed structural validation. Body: `{"errors": [...]}`.
    #[error("configuration is invalid")]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// An upstream service (GitHub) could not be reached.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }

        let body = match self {
            Self::Validation(errors) => json!({ "errors": errors }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// `error: cause: cause` on one line, for bodies that carry a single message.
pub fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => Self::NotFound(e.to_string()),
            StoreError::InvalidId { .. } => Self::BadRequest(e.to_string()),
            other => Self::Internal(error_chain(&other)),
        }
    }
}

impl From<InspectError> for ApiError {
    fn from(e: InspectError) -> Self {
        match e {
            InspectError::MissingUrl | InspectError::InvalidUrl(_) => Self::BadRequest(e.to_string()),
            InspectError::RepositoryNotFound { .. } => Self::NotFound(e.to_string()),
            other => Self::Upstream(error_chain(&other)),
        }
    }
}

/// Chart failures keep the engine's diagnostics in the log; the client
/// only sees the top-level message naming the file.
fn chart_failure(e: &dyn StdError) -> ApiError {
    tracing::error!(error = %error_chain(e), "chart build failed");
    ApiError::Internal(e.to_string())
}

impl From<GenerateError> for ApiError {
    fn from(e: GenerateError) -> Self {
        chart_failure(&e)
    }
}

impl From<PackageError> for ApiError {
    fn from(e: PackageError) -> Self {
        chart_failure(&e)
    }
}

impl From<BuildError> for ApiError {
    fn from(e: BuildError) -> Self {
        chart_failure(&e)
    }
}
