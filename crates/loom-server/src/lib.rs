//! HTTP server for Loom sites.
//!
//! Serves a site directory over HTTP using axum:
//! - `/site/{name}` renders the template `name` (through its layout)
//! - `/content/{path}` returns raw content entries with their content type
//! - `/static/*` serves files from the site's static directory
//!
//! Template changes are picked up by a background watcher task that reloads
//! the registry until the server shuts down.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use loom_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         content_dir: PathBuf::from("site/content"),
//!         templates_dir: PathBuf::from("site/templates"),
//!         static_dir: PathBuf::from("site/static"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (loom-server)
//!                        │
//!                        ├─► /site ──► Templates ──► Cms
//!                        │                ▲
//!                        │                └── ChangeWatcher task (notify)
//!                        │
//!                        ├─► /content ──► Cms
//!                        │
//!                        └─► /static ──► tower-http ServeDir
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use loom_content::Cms;
use loom_templates::{ChangeWatcher, Templates};
use state::AppState;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content root for the CMS.
    pub content_dir: PathBuf,
    /// Template root.
    pub templates_dir: PathBuf,
    /// Static file root.
    pub static_dir: PathBuf,
    /// Reload templates when files change.
    pub watch_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            content_dir: PathBuf::from("site/content"),
            templates_dir: PathBuf::from("site/templates"),
            static_dir: PathBuf::from("site/static"),
            watch_enabled: true,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the content root or templates cannot be loaded, or the
/// listener cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cms = Arc::new(Cms::new(&config.content_dir)?);
    let templates = Arc::new(Templates::new(&config.templates_dir, Arc::clone(&cms))?);

    let token = CancellationToken::new();
    let watcher = config
        .watch_enabled
        .then(|| spawn_watcher(Arc::clone(&templates), token.clone()));

    let state = Arc::new(AppState { cms, templates });
    let app = app::create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    token.cancel();
    if let Some(task) = watcher
        && let Err(e) = task.await
    {
        tracing::error!(error = %e, "Template watcher task failed");
    }

    Ok(())
}

/// Reload templates on every change under their root until `token` is cancelled.
fn spawn_watcher(templates: Arc<Templates>, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let watcher = ChangeWatcher::new(templates.root());
        if let Err(e) = watcher.run(token, || templates.reload()).await {
            tracing::error!(error = %e, "Template watcher stopped");
        }
    })
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Loom config.
#[must_use]
pub fn server_config_from_loom_config(config: &loom_config::Config) -> ServerConfig {
    let site = &config.site_resolved;
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        content_dir: site.content_dir(),
        templates_dir: site.templates_dir(),
        static_dir: site.static_dir(),
        watch_enabled: config.watch.enabled,
    }
}
