//! Runtime-discovered values: current OS and hosting-system HTTP endpoints.

use crate::shared_state::SharedStateStore;

/// Identifier of the OS the run executes on (`linux`, `macos`, `windows`, ...).
pub fn current_os() -> &'static str {
    std::env::consts::OS
}

/// Optional HTTP endpoint details published by a hosting file server.
///
/// A file-serving helper elsewhere in the system publishes its listen
/// address through shared state so scripts can fetch from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub http_addr: Option<String>,
    pub http_ip: Option<String>,
    pub http_port: Option<String>,
}

impl Discovery {
    /// Read discovery values from shared state. Empty values are dropped.
    pub fn from_store<S: SharedStateStore>(store: &S) -> Self {
        Self {
            http_addr: non_empty(store.retrieve("http_addr", "")),
            http_ip: non_empty(store.retrieve("http_ip", "")),
            http_port: non_empty(store.retrieve("http_port", "")),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|contents| !contents.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticSharedState;

    #[test]
    fn from_store_drops_empty_values() {
        let store = StaticSharedState::new()
            .set("http_addr", "", "10.0.0.2:8080")
            .set("http_ip", "", "");

        let discovery = Discovery::from_store(&store);
        assert_eq!(discovery.http_addr.as_deref(), Some("10.0.0.2:8080"));
        assert_eq!(discovery.http_ip, None);
        assert_eq!(discovery.http_port, None);
    }
}
