//! Console reporting for CLI commands.

use std::fmt::Display;

use console::{Style, Term};

/// Writes command progress to stderr.
pub(crate) struct Report {
    term: Term,
    label: Style,
    done: Style,
    failed: Style,
}

impl Report {
    pub(crate) fn stderr() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().bold(),
            done: Style::new().green(),
            failed: Style::new().red().bold(),
        }
    }

    /// One `label: value` line of a command summary.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        let label = self.label.apply_to(format!("{label}:"));
        self.write(&field_line(&label.to_string(), value));
    }

    pub(crate) fn done(&self, msg: &str) {
        self.write(&self.done.apply_to(msg).to_string());
    }

    /// Report the error that ends the command.
    pub(crate) fn failed(&self, err: &dyn Display) {
        let prefix = self.failed.apply_to("error:");
        self.write(&format!("{prefix} {err}"));
    }

    fn write(&self, line: &str) {
        // Nothing sensible to do if stderr is gone
        let _ = self.term.write_line(line);
    }
}

fn field_line(label: &str, value: impl Display) -> String {
    format!("  {label} {value}")
}
