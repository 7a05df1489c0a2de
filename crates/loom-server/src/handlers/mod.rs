//! HTTP request handlers.

pub(crate) mod content;
pub(crate) mod site;
