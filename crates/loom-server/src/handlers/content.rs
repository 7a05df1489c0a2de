//! Public content endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /content/{path}: raw entry bytes with their content type.
///
/// Every lookup failure is reported as not found.
pub(crate) async fn get_content(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let entry = state.cms.read_public_entry(&path).map_err(|e| {
        tracing::debug!(path = %path, error = %e, "Content lookup failed");
        ServerError::ContentNotFound(path.clone())
    })?;

    Ok(([(header::CONTENT_TYPE, entry.content_type())], entry.payload))
}
