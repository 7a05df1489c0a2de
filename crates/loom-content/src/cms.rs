//! Filesystem content resolver.
//!
//! Provides [`Cms`] for listing and reading content files under a sandboxed
//! root directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ContentError, ContentErrorKind};
use crate::kind::ContentKind;
use crate::markdown::markdown_to_html;

/// Directory listing record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    /// File or directory name.
    pub name: String,
    /// Path relative to the content root (e.g., "blog/first-post.md").
    pub path: String,
    /// Content kind classified from the name.
    pub kind: ContentKind,
    /// True for directories.
    pub is_dir: bool,
}

/// Raw content file, ready to be served verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// File name.
    pub name: String,
    /// Content kind classified from the name.
    pub kind: ContentKind,
    /// Raw file bytes.
    pub payload: Vec<u8>,
}

impl Entry {
    /// MIME-style content type for the payload.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }
}

/// Content resolver rooted at an absolute directory.
///
/// All operations take paths relative to the root. The resolver is immutable
/// after construction and safe to share across threads.
#[derive(Clone, Debug)]
pub struct Cms {
    root: PathBuf,
}

impl Cms {
    /// Create a resolver for `root`, creating the directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentErrorKind::Config`] error if the path cannot be made
    /// absolute or the directory cannot be created.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ContentError> {
        let root = root.as_ref();
        let root = std::path::absolute(root).map_err(|e| {
            ContentError::new(ContentErrorKind::Config)
                .with_path(root)
                .with_source(e)
        })?;

        fs::create_dir_all(&root).map_err(|e| {
            ContentError::new(ContentErrorKind::Config)
                .with_path(&root)
                .with_source(e)
        })?;

        tracing::debug!(root = %root.display(), "Content root ready");

        Ok(Self { root })
    }

    /// Absolute content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List immediate children of a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::NotFound`] if the directory does not exist or
    /// cannot be read, and [`ContentErrorKind::InvalidPath`] for paths escaping the root.
    pub fn list_entries(&self, path: &str) -> Result<Vec<EntryInfo>, ContentError> {
        let dir = self.resolve(path)?;
        let read_dir =
            fs::read_dir(&dir).map_err(|e| ContentError::not_found(path).with_source(e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| ContentError::not_found(path).with_source(e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            entries.push(EntryInfo {
                path: join_relative(path, &name),
                kind: ContentKind::from_path(&name),
                name,
                is_dir,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Read a markdown file as text.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::InvalidKind`] if the path is not markdown,
    /// [`ContentErrorKind::NotFound`] if it is absent, and [`ContentErrorKind::Io`]
    /// for other read failures.
    pub fn read_markdown(&self, path: &str) -> Result<String, ContentError> {
        if ContentKind::from_path(path) != ContentKind::Markdown {
            return Err(ContentError::invalid_kind(path, "markdown"));
        }
        let file = self.resolve(path)?;
        fs::read_to_string(&file).map_err(|e| ContentError::io(e, path))
    }

    /// Read a markdown file and render it to HTML.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Cms::read_markdown`] unchanged.
    pub fn read_html(&self, path: &str) -> Result<String, ContentError> {
        let markdown = self.read_markdown(path)?;
        Ok(markdown_to_html(&markdown))
    }

    /// Read a JSON file as a top-level object.
    ///
    /// The kind check happens before the file is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::InvalidKind`] if the path is not JSON and
    /// [`ContentErrorKind::Parse`] if the file is malformed or not an object.
    pub fn read_structured_data(&self, path: &str) -> Result<Map<String, Value>, ContentError> {
        if ContentKind::from_path(path) != ContentKind::Json {
            return Err(ContentError::invalid_kind(path, "JSON"));
        }
        let file = self.resolve(path)?;
        let bytes = fs::read(&file).map_err(|e| ContentError::io(e, path))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            ContentError::new(ContentErrorKind::Parse)
                .with_path(path)
                .with_source(e)
        })
    }

    /// Read any content file verbatim, classified by extension.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::NotFound`] if the file is absent.
    pub fn read_public_entry(&self, path: &str) -> Result<Entry, ContentError> {
        let file = self.resolve(path)?;
        let payload = fs::read(&file).map_err(|e| ContentError::io(e, path))?;
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Entry {
            kind: ContentKind::from_path(&name),
            name,
            payload,
        })
    }

    /// Join a relative path onto the root after validating it.
    fn resolve(&self, path: &str) -> Result<PathBuf, ContentError> {
        validate_path(Path::new(path))?;
        Ok(self.root.join(path))
    }
}

/// Validate that a path stays inside the content root.
///
/// Rejects parent directory components (`..`), absolute paths and drive
/// prefixes (e.g., `../../../etc/passwd`, `/etc/passwd`).
fn validate_path(path: &Path) -> Result<(), ContentError> {
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes {
        return Err(ContentError::new(ContentErrorKind::InvalidPath).with_path(path));
    }
    Ok(())
}

/// Build the root-relative path of a listed child.
fn join_relative(dir: &str, name: &str) -> String {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_cms() -> (tempfile::TempDir, Cms) {
        let dir = tempfile::tempdir().unwrap();
        let cms = Cms::new(dir.path()).unwrap();
        (dir, cms)
    }

    fn write(cms: &Cms, path: &str, content: &[u8]) {
        let full = cms.root().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    #[test]
    fn test_cms_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Cms>();
    }

    #[test]
    fn test_new_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested/content");

        let cms = Cms::new(&root).unwrap();

        assert!(root.is_dir());
        assert!(cms.root().is_absolute());
    }

    #[test]
    fn test_new_fails_when_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("content");
        fs::write(&file, "not a directory").unwrap();

        let err = Cms::new(&file).unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::Config);
    }

    #[test]
    fn test_read_html_renders_heading() {
        let (_dir, cms) = create_cms();
        write(&cms, "hello.md", b"# Hi");

        let html = cms.read_html("hello.md").unwrap();
        assert!(html.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn test_read_markdown_returns_raw_text() {
        let (_dir, cms) = create_cms();
        write(&cms, "blog/post.md", b"Some *text*\n");

        assert_eq!(cms.read_markdown("blog/post.md").unwrap(), "Some *text*\n");
    }

    #[test]
    fn test_read_markdown_rejects_other_kinds() {
        let (_dir, cms) = create_cms();
        write(&cms, "data.json", b"{}");

        let err = cms.read_markdown("data.json").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::InvalidKind);
        let err = cms.read_html("data.json").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::InvalidKind);
    }

    #[test]
    fn test_read_markdown_missing_file() {
        let (_dir, cms) = create_cms();

        let err = cms.read_markdown("missing.md").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::NotFound);
    }

    #[test]
    fn test_read_structured_data() {
        let (_dir, cms) = create_cms();
        write(&cms, "site.json", br#"{"title": "Loom", "tags": ["a", "b"], "count": 3}"#);

        let data = cms.read_structured_data("site.json").unwrap();
        assert_eq!(data["title"], Value::from("Loom"));
        assert_eq!(data["count"], Value::from(3));
        assert_eq!(data["tags"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_read_structured_data_on_markdown_is_invalid_kind() {
        let (_dir, cms) = create_cms();
        write(&cms, "post.md", b"# Post");

        let err = cms.read_structured_data("post.md").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::InvalidKind);
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_read_structured_data_kind_checked_before_io() {
        let (_dir, cms) = create_cms();

        // File does not exist: the kind check must win over the missing file.
        let err = cms.read_structured_data("absent.md").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::InvalidKind);
    }

    #[test]
    fn test_read_structured_data_malformed_json() {
        let (_dir, cms) = create_cms();
        write(&cms, "broken.json", b"{\"title\": ");

        let err = cms.read_structured_data("broken.json").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::Parse);
    }

    #[test]
    fn test_read_structured_data_requires_object() {
        let (_dir, cms) = create_cms();
        write(&cms, "list.json", b"[1, 2, 3]");

        let err = cms.read_structured_data("list.json").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::Parse);
    }

    #[test]
    fn test_list_entries_sorted_with_kinds() {
        let (_dir, cms) = create_cms();
        write(&cms, "blog/b.md", b"# B");
        write(&cms, "blog/a.json", b"{}");
        write(&cms, "blog/img/logo.png", b"\x89PNG");

        let entries = cms.list_entries("blog").unwrap();
        assert_eq!(
            entries,
            vec![
                EntryInfo {
                    name: "a.json".to_owned(),
                    path: "blog/a.json".to_owned(),
                    kind: ContentKind::Json,
                    is_dir: false,
                },
                EntryInfo {
                    name: "b.md".to_owned(),
                    path: "blog/b.md".to_owned(),
                    kind: ContentKind::Markdown,
                    is_dir: false,
                },
                EntryInfo {
                    name: "img".to_owned(),
                    path: "blog/img".to_owned(),
                    kind: ContentKind::Unknown,
                    is_dir: true,
                },
            ]
        );
    }

    #[test]
    fn test_list_entries_root() {
        let (_dir, cms) = create_cms();
        write(&cms, "index.md", b"# Home");

        let entries = cms.list_entries("").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "index.md");
    }

    #[test]
    fn test_list_entries_missing_directory() {
        let (_dir, cms) = create_cms();

        let err = cms.list_entries("nope").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::NotFound);
    }

    #[test]
    fn test_read_public_entry() {
        let (_dir, cms) = create_cms();
        write(&cms, "img/logo.png", b"\x89PNG\r\n");

        let entry = cms.read_public_entry("img/logo.png").unwrap();
        assert_eq!(entry.name, "logo.png");
        assert_eq!(entry.kind, ContentKind::ImagePng);
        assert_eq!(entry.content_type(), "image/png");
        assert_eq!(entry.payload, b"\x89PNG\r\n");
    }

    #[test]
    fn test_read_public_entry_serves_markdown_raw() {
        let (_dir, cms) = create_cms();
        write(&cms, "notes.md", b"# Raw");

        let entry = cms.read_public_entry("notes.md").unwrap();
        assert_eq!(entry.content_type(), "text/markdown");
        assert_eq!(entry.payload, b"# Raw");
    }

    #[test]
    fn test_read_public_entry_missing() {
        let (_dir, cms) = create_cms();

        let err = cms.read_public_entry("missing.png").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::NotFound);
    }

    #[test]
    fn test_rejects_path_traversal() {
        let (_dir, cms) = create_cms();

        for path in ["../secret.md", "blog/../../secret.md", "/etc/passwd"] {
            let err = cms.read_public_entry(path).unwrap_err();
            assert_eq!(err.kind(), ContentErrorKind::InvalidPath, "path: {path}");
        }

        let err = cms.list_entries("..").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::InvalidPath);
        let err = cms.read_html("../secret.md").unwrap_err();
        assert_eq!(err.kind(), ContentErrorKind::InvalidPath);
    }
}
