//! File-backed shared state for values contributed by a hosting system.

use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

/// Read-only access to values another component of the build published.
///
/// Retrieval failure means "no value available"; it never aborts a run.
pub trait SharedStateStore {
    fn retrieve(&self, key: &str, scope: &str) -> Option<String>;
}

/// Store backed by files in a root directory (the system temp dir by default).
///
/// The value for `key` scoped to `scope` lives at
/// `<root>/shellstep-state-<key>[-<scope>]`.
#[derive(Debug, Clone)]
pub struct FileSharedState {
    root: PathBuf,
}

impl FileSharedState {
    pub fn new() -> Self {
        Self {
            root: env::temp_dir(),
        }
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn state_path(&self, key: &str, scope: &str) -> PathBuf {
        if scope.is_empty() {
            self.root.join(format!("shellstep-state-{key}"))
        } else {
            self.root.join(format!("shellstep-state-{key}-{scope}"))
        }
    }
}

impl Default for FileSharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedStateStore for FileSharedState {
    fn retrieve(&self, key: &str, scope: &str) -> Option<String> {
        let path = self.state_path(key, scope);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(err) => {
                debug!(path = %path.display(), err = %err, "no shared state value");
                None
            }
        }
    }
}
