//! Compiled template set with hot reload.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use loom_content::Cms;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use crate::context::RenderContext;
use crate::error::TemplateError;
use crate::functions;

/// File suffix that marks a template.
pub const TEMPLATE_SUFFIX: &str = ".tmpl.html";

/// Reserved file name of a directory layout.
pub const LAYOUT_FILENAME: &str = "__layout.tmpl.html";

/// Public template names and the layout each one renders through.
///
/// Layouts are compiled into the environment under their own logical name
/// but never appear here, so they cannot be requested directly.
#[derive(Debug, Default)]
pub(crate) struct TemplateIndex {
    layouts: BTreeMap<String, Option<String>>,
}

impl TemplateIndex {
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    fn layout(&self, name: &str) -> Option<Option<&str>> {
        self.layouts.get(name).map(Option::as_deref)
    }

    fn len(&self) -> usize {
        self.layouts.len()
    }
}

/// One compiled generation.
#[derive(Debug)]
struct TemplateSet {
    env: Environment<'static>,
    index: Arc<TemplateIndex>,
}

struct TemplateSource {
    name: String,
    path: PathBuf,
    source: String,
}

/// Template registry.
///
/// Holds the current generation behind a read-write lock: renders share it,
/// [`reload`](Self::reload) takes it exclusively and swaps in a new
/// generation only when every file compiled.
#[derive(Debug)]
pub struct Templates {
    root: PathBuf,
    cms: Arc<Cms>,
    set: RwLock<TemplateSet>,
}

impl Templates {
    /// Compile every template under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Config`] if `root` cannot be made absolute,
    /// otherwise the first read or parse failure of the initial compile.
    pub fn new(root: impl AsRef<Path>, cms: Arc<Cms>) -> Result<Self, TemplateError> {
        let root = root.as_ref();
        let root = std::path::absolute(root).map_err(|source| TemplateError::Config {
            path: root.to_path_buf(),
            source,
        })?;
        let set = compile(&root, &cms)?;

        Ok(Self {
            root,
            cms,
            set: RwLock::new(set),
        })
    }

    /// Absolute template root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rebuild the template set from disk.
    ///
    /// Renders are blocked while the new generation compiles. On failure the
    /// previous generation stays in place.
    ///
    /// Returns the number of public templates.
    pub fn reload(&self) -> Result<usize, TemplateError> {
        let mut set = self.set.write().unwrap_or_else(PoisonError::into_inner);

        let next = compile(&self.root, &self.cms).inspect_err(|e| {
            tracing::error!(error = %e, "Template reload failed, keeping previous templates");
        })?;
        let count = next.index.len();
        *set = next;

        Ok(count)
    }

    /// Sorted public template names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let set = self.set.read().unwrap_or_else(PoisonError::into_inner);
        set.index.layouts.keys().cloned().collect()
    }

    /// Render the template `name` into `out`, through its layout if it has one.
    ///
    /// Output written before a failure is not rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] for unknown names and
    /// [`TemplateError::Render`] if execution fails.
    pub fn render<W: io::Write>(&self, name: &str, out: W) -> Result<(), TemplateError> {
        let set = self.set.read().unwrap_or_else(PoisonError::into_inner);

        let layout = set
            .index
            .layout(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_owned()))?;
        let (entry, ctx) = match layout {
            Some(layout) => (layout, RenderContext::new(name).with_slot(name)),
            None => (name, RenderContext::new(name)),
        };

        let render_error = |source| TemplateError::Render {
            name: name.to_owned(),
            source,
        };
        let template = set.env.get_template(entry).map_err(render_error)?;
        template
            .render_captured_to(ctx.into_value(), out)
            .map(|_| ())
            .map_err(render_error)
    }
}

/// Build a complete generation from the tree under `root`.
fn compile(root: &Path, cms: &Arc<Cms>) -> Result<TemplateSet, TemplateError> {
    tracing::info!(root = %root.display(), "Compiling templates");

    let mut sources = Vec::new();
    let mut layouts = BTreeMap::new();
    collect(root, root, &mut sources, &mut layouts)?;
    let index = Arc::new(TemplateIndex { layouts });

    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    functions::register(&mut env, &index, cms);

    for TemplateSource { name, path, source } in sources {
        tracing::debug!(name = %name, path = %path.display(), "Compiling template");
        env.add_template_owned(name, source)
            .map_err(|source| TemplateError::Parse { path, source })?;
    }

    tracing::info!(count = index.len(), "Templates compiled");
    Ok(TemplateSet { env, index })
}

/// Read every template under `dir`.
///
/// Subdirectories are visited first; the directory's own layout is attached to
/// its pages only after all of its entries have been seen.
fn collect(
    root: &Path,
    dir: &Path,
    sources: &mut Vec<TemplateSource>,
    layouts: &mut BTreeMap<String, Option<String>>,
) -> Result<(), TemplateError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| TemplateError::Io { path, source }
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error(dir))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut layout = None;
    let mut pages = Vec::new();

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(io_error(&path))?;

        // Symlinked files are followed, symlinked directories are not.
        if file_type.is_dir() {
            collect(root, &path, sources, layouts)?;
            continue;
        }
        if !is_regular_file(&path, file_type).map_err(io_error(&path))? {
            continue;
        }
        let Some(name) = logical_name(root, &path) else {
            continue;
        };

        let source = fs::read_to_string(&path).map_err(io_error(&path))?;
        if entry.file_name() == LAYOUT_FILENAME {
            layout = Some(name.clone());
        } else {
            pages.push(name.clone());
        }
        sources.push(TemplateSource { name, path, source });
    }

    for page in pages {
        layouts.insert(page, layout.clone());
    }
    Ok(())
}

fn is_regular_file(path: &Path, file_type: fs::FileType) -> io::Result<bool> {
    if !file_type.is_symlink() {
        return Ok(file_type.is_file());
    }
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Skipping dangling symlink");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// `/`-separated path relative to `root` without [`TEMPLATE_SUFFIX`].
///
/// `None` for non-templates and for names that are not valid UTF-8.
fn logical_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    let joined = parts.join("/");
    let name = joined.strip_suffix(TEMPLATE_SUFFIX)?;

    if name.is_empty() || name.ends_with('/') {
        return None;
    }
    Some(name.to_owned())
}
