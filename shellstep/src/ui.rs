//! Line-oriented output sink for run progress and child process output.

use crate::logging::Redactor;

/// Receives informational messages and the live output of child processes.
///
/// Implementations are shared with the output relay threads and must be
/// callable concurrently.
pub trait Ui: Send + Sync {
    /// Informational message from the orchestrator.
    fn say(&self, message: &str);

    /// One line of child process stdout/stderr, without the trailing newline.
    fn output(&self, line: &str);
}

/// Console sink: progress markers on stdout, child output indented, every
/// line passed through the redactor first.
pub struct ConsoleUi {
    redactor: Redactor,
}

impl ConsoleUi {
    pub fn new(redactor: Redactor) -> Self {
        Self { redactor }
    }
}

impl Ui for ConsoleUi {
    fn say(&self, message: &str) {
        println!("==> {}", self.redactor.apply(message));
    }

    fn output(&self, line: &str) {
        println!("    {}", self.redactor.apply(line));
    }
}
