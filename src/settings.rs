//! Persisted app preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::{keys, Storage};

/// Preferred color scheme. `System` follows the platform setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::Validation(format!(
                "Unknown theme '{}', expected light, dark or system",
                other
            ))),
        }
    }
}

/// Preferences stored under the `settings` key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemePreference,
}

impl Settings {
    /// Stored settings, or defaults if none are stored or they can't be read.
    pub async fn load(storage: &Storage) -> Self {
        storage.get_json(keys::SETTINGS).await.unwrap_or_default()
    }

    pub async fn save(&self, storage: &Storage) -> Result<()> {
        storage.set_json(keys::SETTINGS, self).await?;
        tracing::debug!(theme = %self.theme, "Settings saved");
        Ok(())
    }
}
