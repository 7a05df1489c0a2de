//! Template registry for Loom sites.
//!
//! Compiles a directory tree of `*.tmpl.html` files into a name-keyed set of
//! [MiniJinja](https://docs.rs/minijinja) templates and renders them on demand.
//!
//! # Layouts and Slots
//!
//! A file named [`LAYOUT_FILENAME`] wraps every other template in the same
//! directory (not in subdirectories). Rendering `site/index` with a layout in
//! `site/` executes the layout, which places the page body with `Slot`:
//!
//! ```jinja
//! <html><body>{{ Slot(ctx) }}</body></html>
//! ```
//!
//! # Components
//!
//! Any template can render another by name with positional arguments:
//!
//! ```jinja
//! {{ Component(ctx, "components/card", "Title", 42) }}
//! ```
//!
//! Inside `components/card`, `{{ Arg(ctx, 0) }}` yields `"Title"`.
//!
//! # Hot Reload
//!
//! [`Templates::reload`] rebuilds the whole set under an exclusive lock and
//! swaps it in only if every file compiles. [`ChangeWatcher`] drives reloads
//! from filesystem events until its cancellation token fires.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use loom_content::Cms;
//! use loom_templates::Templates;
//!
//! let cms = Arc::new(Cms::new("site/content")?);
//! let templates = Templates::new("site/templates", cms)?;
//!
//! let mut page = Vec::new();
//! templates.render("site/index", &mut page)?;
//! ```

mod context;
mod error;
mod functions;
mod registry;
mod watcher;

pub use context::{IndexOutOfRange, RenderContext};
pub use error::TemplateError;
pub use registry::{LAYOUT_FILENAME, TEMPLATE_SUFFIX, Templates};
pub use watcher::{ChangeWatcher, WatchError};
