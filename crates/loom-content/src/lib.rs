//! Content resolver for Loom sites.
//!
//! This crate provides [`Cms`], a small content-management layer over a
//! directory tree. Files are classified by extension into a [`ContentKind`]
//! and served either raw ([`Entry`]) or transformed:
//!
//! - Markdown files are rendered to HTML with `pulldown-cmark`
//! - JSON files are parsed into structured data
//! - Directories are listed as [`EntryInfo`] records
//!
//! # Path Convention
//!
//! All path parameters are relative to the content root and use `/` separators
//! (e.g., `"blog/first-post.md"`, `""` for the root itself). Paths that try to
//! leave the root (`..`, absolute paths) are rejected with
//! [`ContentErrorKind::InvalidPath`].
//!
//! # Example
//!
//! ```ignore
//! use loom_content::Cms;
//!
//! let cms = Cms::new("site/content")?;
//! let html = cms.read_html("about.md")?;
//! for entry in cms.list_entries("blog")? {
//!     println!("{} ({})", entry.name, entry.kind);
//! }
//! ```

mod cms;
mod error;
mod kind;
mod markdown;

pub use cms::{Cms, Entry, EntryInfo};
pub use error::{ContentError, ContentErrorKind};
pub use kind::ContentKind;
pub use markdown::markdown_to_html;
