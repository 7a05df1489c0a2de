//! `loom check` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use loom_config::{CliSettings, Config, SiteConfig};
use loom_content::Cms;
use loom_templates::Templates;

use crate::error::CliError;
use crate::output::Report;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover loom.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site directory (overrides config).
    #[arg(short, long, env = "LOOM_SITE")]
    site: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any template does not compile.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            site_dir: self.site,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(config_path = ?config.config_path, "Configuration loaded");

        let report = Report::stderr();
        report.field("templates", config.site_resolved.templates_dir().display());
        let count = compile_site(&config.site_resolved)?;
        report.done(&format!("{count} page template(s) compiled"));

        Ok(())
    }
}

/// Compile the site's templates once and return the number of public templates.
fn compile_site(site: &SiteConfig) -> Result<usize, CliError> {
    let cms = Arc::new(Cms::new(site.content_dir())?);
    let templates = Templates::new(site.templates_dir(), cms)?;
    Ok(templates.names().len())
}
