mod loader;
mod types;

pub use loader::{ConfigError, BASE_URL_ENV};
pub use types::{ApiConfig, Config, DisplayConfig, StorageConfig, DEFAULT_BASE_URL};
