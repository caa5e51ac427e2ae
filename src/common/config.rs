//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Browser settings
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Timeout for page loads and explicit navigation waits
    #[serde(default = "default_navigation")]
    pub navigation_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_secs: default_navigation(),
        }
    }
}

fn default_navigation() -> u64 {
    30
}

impl Timeouts {
    /// Navigation timeout as a [`Duration`]
    pub fn navigation(&self) -> Duration {
        Duration::from_secs(self.navigation_secs)
    }
}

/// Browser launch configuration
#[derive(Debug, Deserialize)]
pub struct BrowserConfig {
    /// Run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit path to the browser executable; discovered when unset
    pub executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            executable: None,
        }
    }
}

fn default_headless() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    })?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::Config(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}
