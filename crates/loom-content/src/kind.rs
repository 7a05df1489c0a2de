//! Content classification by file extension.

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

/// Semantic kind of a content file, derived from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Markdown document (`.md`).
    Markdown,
    /// JSON document (`.json`).
    Json,
    /// Plain text (`.txt`).
    Text,
    /// PNG image (`.png`).
    ImagePng,
    /// JPEG image (`.jpg`, `.jpeg`).
    ImageJpeg,
    /// Anything else, including files without an extension.
    Unknown,
}

impl ContentKind {
    /// Classify a path by its extension (case-insensitive).
    ///
    /// Total function: unrecognized or missing extensions map to
    /// [`ContentKind::Unknown`].
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return Self::Unknown;
        };

        match ext.to_ascii_lowercase().as_str() {
            "md" => Self::Markdown,
            "json" => Self::Json,
            "txt" => Self::Text,
            "png" => Self::ImagePng,
            "jpg" | "jpeg" => Self::ImageJpeg,
            _ => Self::Unknown,
        }
    }

    /// MIME-style content type used when serving the raw payload.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Json => "application/json",
            Self::Text => "text/plain",
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::Unknown => "application/octet-stream",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

impl Serialize for ContentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.content_type())
    }
}
