//! Site page endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, Redirect};

use crate::error::ServerError;
use crate::state::AppState;

/// Landing page.
const INDEX_PATH: &str = "/site/index";

/// Handle GET /.
pub(crate) async fn index() -> Redirect {
    Redirect::permanent(INDEX_PATH)
}

/// Handle GET /site/{name}: render the template `name`.
pub(crate) async fn get_page(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<Vec<u8>>, ServerError> {
    let mut body = Vec::new();
    state.templates.render(&name, &mut body)?;
    Ok(Html(body))
}

/// Handle POST /site/{name}.
///
/// Submissions are only logged; the client is sent back to the referring page.
pub(crate) async fn post_page(Path(name): Path<String>, headers: HeaderMap) -> Redirect {
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());
    tracing::info!(name = %name, referer = ?referer, "Form posted");

    match referer {
        Some(target) => Redirect::to(target),
        None => Redirect::to(&format!("/site/{name}")),
    }
}
