//! Functions available to every template.
//!
//! Names follow the template authoring surface (`Slot`, `Component`, ...). All
//! functions are registered per generation and capture that generation's
//! [`TemplateIndex`], so lookups never touch the registry lock.

use std::cell::Cell;
use std::sync::Arc;

use loom_content::{Cms, ContentError};
use minijinja::value::{Object, Rest};
use minijinja::{Environment, Error, ErrorKind, State, Value};

use crate::context::RenderContext;
use crate::registry::TemplateIndex;

/// Register the function map on a freshly built environment.
pub(crate) fn register(env: &mut Environment<'static>, index: &Arc<TemplateIndex>, cms: &Arc<Cms>) {
    let idx = Arc::clone(index);
    env.add_function(
        "RenderTemplate",
        move |state: &State, name: &str, data: Option<Value>| -> Result<Value, Error> {
            let root = Value::from_object(TemplateData(data.unwrap_or_default()));
            render_named(state, &idx, name, root)
        },
    );

    let idx = Arc::clone(index);
    env.add_function("Slot", move |state: &State, ctx: &Value| -> Result<Value, Error> {
        let render_ctx = context_arg(ctx, "Slot")?;
        let slot = render_ctx.slot().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidOperation,
                "Slot called outside of a layout",
            )
        })?;
        render_named(state, &idx, slot, ctx.clone())
    });

    let idx = Arc::clone(index);
    env.add_function(
        "Component",
        move |state: &State, ctx: &Value, name: &str, args: Rest<Value>| -> Result<Value, Error> {
            let render_ctx = context_arg(ctx, "Component")?;
            render_named(state, &idx, name, render_ctx.with_args(args.0).into_value())
        },
    );

    env.add_function("Current", |ctx: &Value| -> Result<Value, Error> {
        Ok(Value::from(context_arg(ctx, "Current")?.current()))
    });

    env.add_function(
        "AttrIfCurrent",
        |ctx: &Value, name: &str, value: String| -> Result<Value, Error> {
            if context_arg(ctx, "AttrIfCurrent")?.current() == name {
                Ok(Value::from_safe_string(value))
            } else {
                Ok(Value::from(""))
            }
        },
    );

    env.add_function(
        "ClassIfCurrent",
        |ctx: &Value, name: &str, value: &str| -> Result<Value, Error> {
            if context_arg(ctx, "ClassIfCurrent")?.current() == name {
                Ok(Value::from_safe_string(format!(
                    "class=\"{}\"",
                    escape_attr(value)
                )))
            } else {
                Ok(Value::from(""))
            }
        },
    );

    let content = Arc::clone(cms);
    env.add_function("ContentEntries", move |path: &str| -> Result<Value, Error> {
        let entries = content.list_entries(path).map_err(content_error)?;
        Ok(Value::from_serialize(&entries))
    });

    let content = Arc::clone(cms);
    env.add_function("ContentHTML", move |path: &str| -> Result<Value, Error> {
        let html = content.read_html(path).map_err(content_error)?;
        Ok(Value::from_safe_string(html))
    });

    let content = Arc::clone(cms);
    env.add_function("ContentData", move |path: &str| -> Result<Value, Error> {
        let data = content.read_structured_data(path).map_err(content_error)?;
        Ok(Value::from_serialize(&data))
    });

    env.add_function("Arg", |ctx: &Value, index: i64| -> Result<Value, Error> {
        context_arg(ctx, "Arg")?
            .arg(index)
            .cloned()
            .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err))
    });

    env.add_function("Log", |values: Rest<Value>| {
        let message = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(message = %message, "Template log");
        Value::from("")
    });
}

/// Deepest chain of `RenderTemplate`, `Slot` and `Component` calls one render may build.
pub(crate) const MAX_NESTING: usize = 32;

thread_local! {
    // Nested renders run synchronously on the caller's thread.
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

/// Marks one level of nested rendering for as long as it lives.
#[derive(Debug)]
struct NestingGuard;

impl NestingGuard {
    fn enter(name: &str) -> Result<Self, Error> {
        let depth = NESTING.get();
        if depth >= MAX_NESTING {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("rendering {name:?} exceeds {MAX_NESTING} nested templates"),
            ));
        }
        NESTING.set(depth + 1);
        Ok(Self)
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        NESTING.set(NESTING.get().saturating_sub(1));
    }
}

/// Render a public template from inside a running render.
fn render_named(
    state: &State,
    index: &TemplateIndex,
    name: &str,
    root: Value,
) -> Result<Value, Error> {
    if !index.contains(name) {
        return Err(Error::new(
            ErrorKind::TemplateNotFound,
            format!("template {name:?} does not exist"),
        ));
    }
    let _guard = NestingGuard::enter(name)?;
    let template = state.env().get_template(name)?;
    let html = template.render(root)?;
    Ok(Value::from_safe_string(html))
}

fn context_arg<'a>(value: &'a Value, function: &str) -> Result<&'a RenderContext, Error> {
    RenderContext::from_value(value).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("{function} expects the render context (`ctx`) as first argument"),
        )
    })
}

fn content_error(err: ContentError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Root context of `RenderTemplate`: `data` itself plus its keys when it is a map.
#[derive(Debug)]
struct TemplateData(Value);

impl Object for TemplateData {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        if key.as_str() == Some("data") {
            return Some(self.0.clone());
        }
        self.0.get_item(key).ok().filter(|v| !v.is_undefined())
    }
}
