//! Render context passed into every template execution.

use std::sync::Arc;

use minijinja::Value;
use minijinja::value::{Enumerator, Object};

/// Per-render state handed to a template body.
///
/// Exposed to templates as the root context:
///
/// | Variable | Value |
/// |----------|-------|
/// | `ctx` | the context itself, for passing to `Slot`, `Component`, `Arg`, ... |
/// | `current` | logical name of the page being rendered |
/// | `args` | positional arguments of a component invocation |
///
/// Contexts are immutable; components receive a copy with only the
/// arguments replaced (see [`RenderContext::with_args`]).
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    slot: Option<String>,
    current: String,
    args: Vec<Value>,
}

impl RenderContext {
    /// Context for rendering `current` directly.
    #[must_use]
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            slot: None,
            current: current.into(),
            args: Vec::new(),
        }
    }

    /// Set the template a layout should render at its slot.
    #[must_use]
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Copy of this context with `args` replaced.
    #[must_use]
    pub fn with_args(&self, args: Vec<Value>) -> Self {
        Self {
            slot: self.slot.clone(),
            current: self.current.clone(),
            args,
        }
    }

    /// Name of the wrapped template, when rendering inside a layout.
    #[must_use]
    pub fn slot(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Logical name of the page being rendered.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Component arguments in call order.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Bounds-checked positional argument access.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index` is negative or not less than the
    /// number of arguments.
    pub fn arg(&self, index: i64) -> Result<&Value, IndexOutOfRange> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.args.get(i))
            .ok_or(IndexOutOfRange {
                index,
                len: self.args.len(),
            })
    }

    /// Wrap the context as a template value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::from_object(self)
    }

    /// Recover a context from a template value.
    pub(crate) fn from_value(value: &Value) -> Option<&Self> {
        value.downcast_object_ref::<Self>()
    }
}

impl Object for RenderContext {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "ctx" => Some(Value::from_object(Self::clone(self))),
            "current" => Some(Value::from(self.current.clone())),
            "args" => Some(Value::from(self.args.clone())),
            _ => None,
        }
    }

    // `ctx` is resolvable but not listed, so printing a context cannot recurse.
    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&["current", "args"])
    }
}

/// Component argument index outside `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("argument index {index} out of range ({len} argument(s) supplied)")]
pub struct IndexOutOfRange {
    /// Requested index.
    pub index: i64,
    /// Number of supplied arguments.
    pub len: usize,
}
