//! Startup configuration: which store endpoint to talk to.

use crate::client::TodoClient;

pub const STORE_URL_VAR: &str = "TODO_STORE_URL";
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub endpoint: String,
}

impl StoreConfig {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    /// Read `TODO_STORE_URL`, falling back to the local mock store.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup(STORE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_URL.to_string());
        Self { endpoint }
    }

    pub fn client(&self) -> TodoClient {
        TodoClient::new(&self.endpoint)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_URL)
    }
}
