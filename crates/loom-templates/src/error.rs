//! Template error types.

use std::path::PathBuf;

/// Errors from compiling or rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Template root could not be resolved.
    #[error("Invalid template root {}: {source}", path.display())]
    Config {
        /// Configured root.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No public template is registered under the name.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// A template file failed to compile.
    #[error("Failed to parse template {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Compiler error.
        #[source]
        source: minijinja::Error,
    },

    /// Reading the template tree failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Template execution failed.
    #[error("Failed to render template {name}: {source}")]
    Render {
        /// Logical name of the requested template.
        name: String,
        /// Execution error, with nested render and content errors as its sources.
        #[source]
        source: minijinja::Error,
    },
}
