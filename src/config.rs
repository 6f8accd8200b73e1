//! User configuration for meal-wheel.
//!
//! Read from `~/.config/meal-wheel/config.toml`. Every section and key is
//! optional; missing values fall back to the defaults below. A commented
//! default file is written the first time the app runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub wheel: WheelConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Edge length of the square wheel canvas in pixels.
    pub size: f64,
    pub spin_duration_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database document. Defaults to `food-wheel.json` in the data directory.
    pub path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            size: 400.0,
            spin_duration_ms: 4000,
        }
    }
}

const DEFAULT_FILE: &str = r#"# meal-wheel configuration

[server]
# host = "127.0.0.1"
# port = 3000

[wheel]
# size = 400.0
# spin_duration_ms = 4000

[storage]
# path = "/path/to/food-wheel.json"
"#;

impl Config {
    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.wheel.spin_duration_ms)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialize from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load `path`, writing the commented default first if it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        ensure_default_file(path);
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml(&text)
                    .with_context(|| format!("Invalid config file {}", path.display()))?;
                info!(target: "config", path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

fn ensure_default_file(path: &Path) {
    if path.exists() {
        return;
    }
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(target: "config", "Failed to create config dir {}: {e}", parent.display());
            return;
        }
    }
    if let Err(e) = std::fs::write(path, DEFAULT_FILE) {
        warn!(target: "config", "Failed to write default config at {}: {e}", path.display());
    }
}
