//! Serializable settings for building a `JsonClient`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::Headers;

/// Timeout used when none is configured, and by the free request functions.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client settings as they would appear in a config file.
///
/// `timeout_ms` of zero disables the global timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub default_headers: Headers,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: Headers::new(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
