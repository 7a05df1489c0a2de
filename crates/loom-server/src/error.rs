//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use loom_templates::TemplateError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No public template with this name.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Content entry missing or unreadable.
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    /// Template execution failed.
    #[error("Render error: {0}")]
    Render(TemplateError),
}

impl From<TemplateError> for ServerError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(name) => Self::TemplateNotFound(name),
            other => Self::Render(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::TemplateNotFound(_) | Self::ContentNotFound(_) => StatusCode::NOT_FOUND,
            Self::Render(e) => {
                tracing::error!(error = %e, "Failed to render page");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
