use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Public test backend used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Remote resource API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for every endpoint (e.g., "https://jsonplaceholder.typicode.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Whole-request timeout in seconds. Unset means requests never time out.
    #[serde(default)]
    pub request_timeout_seconds: Option<u32>,
}

/// Durable store settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Location of the JSON store file. Defaults to the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// List presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum number of items shown from a fetched list (default: 10).
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_list_limit() -> usize {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_seconds: default_connect_timeout(),
            request_timeout_seconds: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
        }
    }
}
