//! Content error types.

use std::path::{Path, PathBuf};

/// Semantic error categories for content operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentErrorKind {
    /// Content root could not be resolved or created.
    Config,
    /// File or directory does not exist (or cannot be listed).
    NotFound,
    /// Operation requested against a file of the wrong content kind.
    InvalidKind,
    /// Path escapes the content root.
    InvalidPath,
    /// File contents could not be parsed.
    Parse,
    /// Other filesystem failure.
    Io,
}

/// Content error with semantic kind, path context and optional source.
#[derive(Debug)]
pub struct ContentError {
    kind: ContentErrorKind,
    path: Option<PathBuf>,
    message: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ContentError {
    /// Create a new content error.
    #[must_use]
    pub fn new(kind: ContentErrorKind) -> Self {
        Self {
            kind,
            path: None,
            message: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach a human-readable detail message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> ContentErrorKind {
        self.kind
    }

    /// Path the error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(ContentErrorKind::NotFound).with_path(path)
    }

    /// Create an error for a file whose kind does not match the operation.
    #[must_use]
    pub fn invalid_kind(path: impl Into<PathBuf>, expected: &str) -> Self {
        Self::new(ContentErrorKind::InvalidKind)
            .with_path(path)
            .with_message(format!("not a {expected} file"))
    }

    /// Create a content error from an I/O error.
    ///
    /// `NotFound` I/O errors keep their meaning; everything else is [`ContentErrorKind::Io`].
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ContentErrorKind::NotFound,
            _ => ContentErrorKind::Io,
        };
        Self::new(kind).with_path(path).with_source(err)
    }
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "Kind: message: source (path: foo/bar)"
        let kind_str = match self.kind {
            ContentErrorKind::Config => "Invalid content root",
            ContentErrorKind::NotFound => "Not found",
            ContentErrorKind::InvalidKind => "Invalid content kind",
            ContentErrorKind::InvalidPath => "Invalid path",
            ContentErrorKind::Parse => "Parse error",
            ContentErrorKind::Io => "I/O error",
        };

        write!(f, "{kind_str}")?;

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}
