//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use loom_content::Cms;
use loom_templates::Templates;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Content resolver for `/content` requests.
    pub(crate) cms: Arc<Cms>,
    /// Template registry for `/site` requests.
    pub(crate) templates: Arc<Templates>,
}
