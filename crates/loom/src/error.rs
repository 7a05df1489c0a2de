//! CLI error types.

use loom_config::ConfigError;
use loom_content::ContentError;
use loom_templates::TemplateError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Server(String),
}
