//! `loom serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use loom_config::{CliSettings, Config};
use loom_server::{run_server, server_config_from_loom_config};

use crate::error::CliError;
use crate::output::Report;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover loom.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site directory containing content/, templates/ and static/ (overrides config).
    #[arg(short, long, env = "LOOM_SITE")]
    site: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Reload templates when they change (default: enabled).
    #[arg(long)]
    watch: Option<bool>,

    /// Disable template reloading.
    #[arg(long, conflicts_with = "watch")]
    no_watch: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            watch_enabled: self.resolve_watch_enabled(),
            host: self.host,
            port: self.port,
            site_dir: self.site,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let report = Report::stderr();
        report.field(
            "listening",
            format!("http://{}:{}/", config.server.host, config.server.port),
        );
        report.field("site", config.site_resolved.dir.display());
        report.field(
            "reload",
            if config.watch.enabled { "on change" } else { "off" },
        );

        run_server(server_config_from_loom_config(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `watch_enabled` from --watch/--no-watch flags.
    fn resolve_watch_enabled(&self) -> Option<bool> {
        self.no_watch.then_some(false).or(self.watch)
    }
}
