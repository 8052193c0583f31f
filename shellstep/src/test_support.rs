//! Test-only fakes for the UI sink and shared-state store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::logging::Redactor;
use crate::shared_state::SharedStateStore;
use crate::ui::Ui;

/// UI sink that records every line for assertions.
#[derive(Debug, Default)]
pub struct TestUi {
    redactor: Option<Redactor>,
    messages: Mutex<Vec<String>>,
    output: Mutex<Vec<String>>,
}

impl TestUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record lines after passing them through `redactor`, like the console
    /// sink does.
    pub fn with_redactor(redactor: Redactor) -> Self {
        Self {
            redactor: Some(redactor),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock").clone()
    }

    pub fn output_lines(&self) -> Vec<String> {
        self.output.lock().expect("output lock").clone()
    }

    fn scrub(&self, line: &str) -> String {
        match &self.redactor {
            Some(redactor) => redactor.apply(line),
            None => line.to_string(),
        }
    }
}

impl Ui for TestUi {
    fn say(&self, message: &str) {
        let message = self.scrub(message);
        self.messages.lock().expect("messages lock").push(message);
    }

    fn output(&self, line: &str) {
        let line = self.scrub(line);
        self.output.lock().expect("output lock").push(line);
    }
}

/// Shared-state store serving values from an in-memory map.
#[derive(Debug, Default)]
pub struct StaticSharedState {
    values: HashMap<(String, String), String>,
}

impl StaticSharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, scope: &str, value: &str) -> Self {
        self.values
            .insert((key.to_string(), scope.to_string()), value.to_string());
        self
    }
}

impl SharedStateStore for StaticSharedState {
    fn retrieve(&self, key: &str, scope: &str) -> Option<String> {
        self.values
            .get(&(key.to_string(), scope.to_string()))
            .cloned()
    }
}
