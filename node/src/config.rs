//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};

use crate::NodeError;

/// Configuration for a callscope node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so
/// a partial file overrides only what it names.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Port the HTTP/WebSocket API listens on.
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Base URL of the external transaction-history provider.
    #[serde(default = "default_scan_base_url")]
    pub scan_base_url: String,

    /// API key sent with provider requests. Empty is accepted; the
    /// provider then serves rate-limited responses.
    #[serde(default)]
    pub scan_api_key: String,

    /// Per-request timeout for provider fetches, in seconds.
    #[serde(default = "default_scan_timeout_secs")]
    pub scan_timeout_secs: u64,

    /// Event-queue depth per connected traffic observer.
    #[serde(default = "default_observer_buffer")]
    pub observer_buffer: usize,

    /// Whether to mount the Prometheus `/metrics` endpoint.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_api_port() -> u16 {
    7080
}

fn default_scan_base_url() -> String {
    "https://api.sonicscan.org/api".to_string()
}

fn default_scan_timeout_secs() -> u64 {
    10
}

fn default_observer_buffer() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            scan_base_url: default_scan_base_url(),
            scan_api_key: String::new(),
            scan_timeout_secs: default_scan_timeout_secs(),
            observer_buffer: default_observer_buffer(),
            enable_metrics: false,
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}
