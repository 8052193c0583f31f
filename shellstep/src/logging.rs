//! Development-time tracing and secret redaction for run output.
//!
//! # Separation of Concerns
//!
//! - **Tracing ([`init`])**: Dev diagnostics via `RUST_LOG`, output to stderr.
//!   Not part of run product output.
//!
//! - **Redaction ([`Redactor`])**: Scrubs secret values from the lines shown
//!   to the user. An explicit component owned by the caller and injected into
//!   the orchestrator and UI sink; there is no process-global filter.

use std::sync::{Arc, Mutex};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=shellstep=debug cargo run -- run
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// Replaces registered secret values with a placeholder in emitted text.
///
/// Cloning produces another handle to the same secret set, so values
/// registered mid-run through one handle are redacted everywhere.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    secrets: Arc<Mutex<Vec<String>>>,
}

impl Redactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value to redact. Empty values are ignored.
    pub fn register(&self, secret: &str) {
        if secret.is_empty() {
            return;
        }
        let mut secrets = self.secrets.lock().expect("redactor lock");
        if !secrets.iter().any(|known| known == secret) {
            secrets.push(secret.to_string());
        }
    }

    /// Replace every registered secret in `text` with `<redacted>`.
    pub fn apply(&self, text: &str) -> String {
        let secrets = self.secrets.lock().expect("redactor lock");
        let mut scrubbed = text.to_string();
        for secret in &*secrets {
            scrubbed = scrubbed.replace(secret, "<redacted>");
        }
        scrubbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_registered_secrets() {
        let redactor = Redactor::new();
        redactor.register("hunter2");

        let scrubbed = redactor.apply("password is hunter2, repeat hunter2");
        assert_eq!(scrubbed, "password is <redacted>, repeat <redacted>");
    }

    #[test]
    fn empty_secret_is_ignored() {
        let redactor = Redactor::new();
        redactor.register("");

        assert_eq!(redactor.apply("untouched"), "untouched");
    }

    #[test]
    fn clones_share_the_secret_set() {
        let redactor = Redactor::new();
        let handle = redactor.clone();
        handle.register("tok3n");

        assert_eq!(redactor.apply("got tok3n"), "got <redacted>");
    }
}
