//! Filesystem watcher driving template reloads.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Errors from setting up the watcher.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The OS watch could not be created or registered.
    #[error("Failed to watch for changes: {0}")]
    Init(#[from] notify::Error),
}

/// Recursive watcher over a directory tree.
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    root: PathBuf,
}

impl ChangeWatcher {
    /// Create a watcher for `root`. Nothing is watched until [`run`](Self::run).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Watched directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Call `on_change` for every create, modify or remove event under the
    /// root until `token` is cancelled.
    ///
    /// Failures of `on_change` are logged and watching continues. The OS watch
    /// is released when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Init`] if the watch cannot be established.
    pub async fn run<F, T, E>(&self, token: CancellationToken, mut on_change: F) -> Result<(), WatchError>
    where
        F: FnMut() -> Result<T, E>,
        E: Display,
    {
        let (tx, mut rx) = mpsc::channel::<Result<Event, notify::Error>>(100);

        // Callback runs on the notify thread, outside the runtime
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })?;
        watcher.watch(&self.root, RecursiveMode::Recursive)?;

        tracing::info!(path = %self.root.display(), "Watching for changes");

        loop {
            tokio::select! {
                () = token.cancelled() => break,
                received = rx.recv() => match received {
                    Some(Ok(event)) => {
                        if !is_change(&event.kind) {
                            continue;
                        }
                        tracing::debug!(paths = ?event.paths, kind = ?event.kind, "Change detected");
                        if let Err(e) = on_change() {
                            tracing::error!(error = %e, "Failed to apply change");
                        }
                    }
                    Some(Err(e)) => tracing::warn!(error = %e, "Watch error"),
                    None => break,
                },
            }
        }

        drop(watcher);
        tracing::info!(path = %self.root.display(), "Stopped watching");
        Ok(())
    }
}

/// Access events are produced by reloads reading the tree and must not
/// trigger another reload.
fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
