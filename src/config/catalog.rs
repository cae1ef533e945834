// Catalog upstream configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upstream catalog connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (no trailing path)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds (default: 20s)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://world.openfoodfacts.org".to_string()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    format!("nutriboard/{}", env!("CARGO_PKG_VERSION"))
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("catalog base_url cannot be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "catalog base_url '{}' must start with http:// or https://",
                self.base_url
            ));
        }
        if self.timeout_ms == 0 {
            return Err("catalog timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
