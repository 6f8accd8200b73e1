//! Application directory structure for meal-wheel.
//!
//! - Config: `~/.config/meal-wheel/` (human-editable, XDG-style)
//! - Data:   `~/Library/Application Support/com.mealwheel.meal-wheel/` on macOS,
//!   `$XDG_DATA_HOME/meal-wheel/` elsewhere
//! - Logs:   `~/Library/Logs/meal-wheel/` on macOS, `<data>/logs` elsewhere

use std::path::{Path, PathBuf};
use tracing::info;

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
const BUNDLE_ID: &str = "com.mealwheel.meal-wheel";
pub const APP_NAME: &str = "meal-wheel";

/// File name of the wheel database inside the data directory.
pub const DB_FILE: &str = "food-wheel.json";
/// File name of the TOML config inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// All resolved application directory paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config: PathBuf,
    pub data: PathBuf,
    pub logs: PathBuf,
}

impl AppPaths {
    /// Resolve all paths from the user's home directory.
    /// Does not create any directories; call `ensure()` for that.
    pub fn resolve() -> Option<Self> {
        let home = std::env::var("HOME").ok().map(PathBuf::from)?;
        Some(Self::under_home(&home))
    }

    fn under_home(home: &Path) -> Self {
        Self {
            config: resolve_config_dir(home),
            data: resolve_data_dir(home),
            logs: resolve_log_dir(home),
        }
    }

    /// Create all directories that don't already exist.
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [&self.config, &self.data, &self.logs] {
            std::fs::create_dir_all(dir)?;
            info!("ensured directory: {}", dir.display());
        }
        Ok(())
    }

    pub fn config_file(&self) -> PathBuf {
        self.config.join(CONFIG_FILE)
    }

    pub fn db_file(&self) -> PathBuf {
        self.data.join(DB_FILE)
    }
}

// ---------------------------------------------------------------------------
// Platform-specific path resolution
// ---------------------------------------------------------------------------

fn resolve_config_dir(home: &Path) -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join(APP_NAME)
    } else {
        home.join(".config").join(APP_NAME)
    }
}

#[cfg(target_os = "macos")]
fn resolve_data_dir(home: &Path) -> PathBuf {
    home.join("Library")
        .join("Application Support")
        .join(BUNDLE_ID)
}

#[cfg(not(target_os = "macos"))]
fn resolve_data_dir(home: &Path) -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join(APP_NAME)
    } else {
        home.join(".local").join("share").join(APP_NAME)
    }
}

#[cfg(target_os = "macos")]
fn resolve_log_dir(home: &Path) -> PathBuf {
    home.join("Library").join("Logs").join(APP_NAME)
}

#[cfg(not(target_os = "macos"))]
fn resolve_log_dir(home: &Path) -> PathBuf {
    resolve_data_dir(home).join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_produces_valid_paths() {
        let paths = AppPaths::under_home(Path::new("/home/tester"));
        assert!(paths.config.to_string_lossy().contains(APP_NAME));
        assert!(paths.logs.to_string_lossy().contains(APP_NAME));
        assert!(paths.config_file().ends_with("config.toml"));
        assert!(paths.db_file().ends_with("food-wheel.json"));
        assert!(paths.db_file().starts_with(&paths.data));
    }

    #[test]
    fn ensure_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths {
            config: tmp.path().join("config"),
            data: tmp.path().join("data"),
            logs: tmp.path().join("data/logs"),
        };

        paths.ensure().expect("ensure should succeed");

        assert!(paths.config.is_dir());
        assert!(paths.data.is_dir());
        assert!(paths.logs.is_dir());
    }
}
