//! Markdown to HTML conversion.

use pulldown_cmark::{Parser, html};

/// Convert `CommonMark` text to HTML.
///
/// Uses `pulldown-cmark` with default options: no tables, footnotes or other
/// extensions are enabled.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
