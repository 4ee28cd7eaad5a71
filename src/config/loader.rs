use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::Config;
use crate::storage::FileStore;

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "STARTER_API_URL";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/starter-core/config.toml` on Linux, or the
    /// platform equivalent via `dirs::config_dir()`. Falls back to the
    /// current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("starter-core").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// `base_url` is a caller-supplied override (e.g. a command-line flag)
    /// that beats both `STARTER_API_URL` and the file.
    pub fn load(base_url: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path(), base_url)
    }

    /// Loads configuration from `path`, reading `STARTER_API_URL` from the
    /// process environment.
    pub fn load_from(path: &Path, base_url: Option<&str>) -> Result<Self, ConfigError> {
        let env_base_url = std::env::var(BASE_URL_ENV).ok();
        Self::resolve(path, env_base_url.as_deref(), base_url)
    }

    /// Builds the effective configuration from every source.
    ///
    /// Precedence for the base URL: `cli_base_url`, then `env_base_url`,
    /// then the file, then [`DEFAULT_BASE_URL`](crate::config::DEFAULT_BASE_URL).
    /// Validation runs once, after all overrides are applied.
    ///
    /// - If the file doesn't exist, the file layer is `Config::default()`.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn resolve(
        path: &Path,
        env_base_url: Option<&str>,
        cli_base_url: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Config::default()
        };

        config.override_base_url(env_base_url, "environment");
        config.override_base_url(cli_base_url, "command line");
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL with an externally supplied one, if non-empty.
    pub fn override_base_url(&mut self, base_url: Option<&str>, source: &'static str) {
        if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
            tracing::debug!(base_url = %url, source, "Base URL overridden");
            self.api.base_url = url.to_string();
        }
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The base URL parses and uses http or https
    /// - The list limit is at least 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| ConfigError::ValidationError {
            message: format!("Invalid api.base_url '{}': {}", self.api.base_url, e),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "api.base_url must use http or https, got '{}'",
                    url.scheme()
                ),
            });
        }

        if self.display.list_limit == 0 {
            return Err(ConfigError::ValidationError {
                message: "display.list_limit must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Store file location, configured or default.
    pub fn storage_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(FileStore::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    use tempfile::TempDir;

    #[test]
    fn override_replaces_base_url() {
        let mut config = Config::default();
        config.override_base_url(Some("http://localhost:3000"), "test");
        assert_eq!(config.api.base_url, "http://localhost:3000");
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut config = Config::default();
        config.override_base_url(Some("   "), "test");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        config.override_base_url(None, "test");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn command_line_beats_environment_beats_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://file.local\"\n").unwrap();

        let config = Config::resolve(&path, None, None).unwrap();
        assert_eq!(config.api.base_url, "http://file.local");

        let config = Config::resolve(&path, Some("http://env.local"), None).unwrap();
        assert_eq!(config.api.base_url, "http://env.local");

        let config =
            Config::resolve(&path, Some("http://env.local"), Some("http://cli.local")).unwrap();
        assert_eq!(config.api.base_url, "http://cli.local");
    }

    #[test]
    fn invalid_environment_is_rescued_by_command_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(
            Config::resolve(&path, Some("ftp://bad"), None),
            Err(ConfigError::ValidationError { .. })
        ));
        let config = Config::resolve(&path, Some("ftp://bad"), Some("https://ok.example")).unwrap();
        assert_eq!(config.api.base_url, "https://ok.example");
    }

    #[test]
    fn validation_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn validation_rejects_zero_limit() {
        let mut config = Config::default();
        config.display.list_limit = 0;
        assert!(config.validate().is_err());
    }
}
