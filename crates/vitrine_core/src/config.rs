use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::BuilderError;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::store::CanvasMode;

/// Title given to documents that were never named.
pub const DEFAULT_PAGE_TITLE: &str = "Página sem título";
/// Title used in the exported `<title>` when the page has none.
pub const DEFAULT_EXPORT_TITLE: &str = "Descrição do Produto";
pub const DEFAULT_EXPORT_FILENAME: &str = "produto-page.html";
pub const DEFAULT_STORAGE_KEY: &str = "eplus-page-builder";

/// Builder configuration stored at `~/.vitrine/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    // Document
    pub default_title: String,
    pub history_limit: usize,

    // Persistence
    pub storage_key: String,
    pub autosave: bool,

    // Export
    pub export_title: String,
    pub export_filename: String,

    // UI
    pub canvas_mode: CanvasMode,

    // General
    pub log_level: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_PAGE_TITLE.into(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            storage_key: DEFAULT_STORAGE_KEY.into(),
            autosave: true,
            export_title: DEFAULT_EXPORT_TITLE.into(),
            export_filename: DEFAULT_EXPORT_FILENAME.into(),
            canvas_mode: CanvasMode::Desktop,
            log_level: "info".into(),
        }
    }
}

impl BuilderConfig {
    /// Returns the base config directory: `~/.vitrine/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".vitrine"))
    }

    /// Returns the config file path: `~/.vitrine/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.vitrine/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Path of the persisted page blob inside `dir`, named after the storage key.
    pub fn page_path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", self.storage_key))
    }

    /// Returns the persisted page path: `~/.vitrine/<storage_key>.json`
    pub fn page_path(&self) -> Result<PathBuf> {
        Ok(self.page_path_in(&Self::base_dir()?))
    }

    /// Ensures all required directories exist.
    pub fn ensure_dirs() -> Result<()> {
        for dir in [Self::base_dir()?, Self::logs_dir()?] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
        }
        Ok(())
    }

    /// Loads config from `~/.vitrine/config.json`.
    pub fn load() -> Result<Self> {
        Self::ensure_dirs()?;
        Self::load_from(&Self::config_path()?)
    }

    /// Loads config from an explicit path. A missing file yields defaults; a
    /// corrupt or invalid file is logged and replaced by defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = match serde_json::from_str::<Self>(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring corrupt config at {}: {e}", path.display());
                return Ok(Self::default());
            }
        };
        if let Err(e) = config.validate() {
            warn!("Ignoring invalid config at {}: {e}", path.display());
            return Ok(Self::default());
        }
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Saves config to `~/.vitrine/config.json`.
    pub fn save(&self) -> Result<()> {
        Self::ensure_dirs()?;
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), BuilderError> {
        if self.history_limit == 0 {
            return Err(BuilderError::Config(
                "history_limit must be at least 1".into(),
            ));
        }
        if self.export_filename.trim().is_empty() {
            return Err(BuilderError::Config(
                "export_filename must not be empty".into(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(BuilderError::Config("storage_key must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let c = BuilderConfig::default();
        assert_eq!(c.default_title, "Página sem título");
        assert_eq!(c.export_title, "Descrição do Produto");
        assert_eq!(c.export_filename, "produto-page.html");
        assert_eq!(c.history_limit, 50);
        assert_eq!(c.storage_key, "eplus-page-builder");
        assert!(c.autosave);
        assert_eq!(c.canvas_mode, CanvasMode::Desktop);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        let config = BuilderConfig {
            history_limit: 20,
            canvas_mode: CanvasMode::Mobile,
            export_filename: "monitor.html".into(),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = BuilderConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let loaded = BuilderConfig::load_from(&tmp.path().join("config.json")).unwrap();
        assert_eq!(loaded, BuilderConfig::default());
    }

    #[test]
    fn load_corrupt_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{{{ not json").unwrap();
        assert_eq!(
            BuilderConfig::load_from(&path).unwrap(),
            BuilderConfig::default()
        );
    }

    #[test]
    fn load_partial_json_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "history_limit": 10, "canvas_mode": "tablet" }"#).unwrap();

        let loaded = BuilderConfig::load_from(&path).unwrap();
        assert_eq!(loaded.history_limit, 10);
        assert_eq!(loaded.canvas_mode, CanvasMode::Tablet);
        assert_eq!(loaded.export_filename, "produto-page.html");
    }

    #[test]
    fn invalid_values_fall_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "history_limit": 0 }"#).unwrap();
        assert_eq!(BuilderConfig::load_from(&path).unwrap().history_limit, 50);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero = BuilderConfig {
            history_limit: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(BuilderError::Config(_))));

        let blank = BuilderConfig {
            export_filename: "  ".into(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn page_path_uses_storage_key() {
        let config = BuilderConfig::default();
        let path = config.page_path_in(Path::new("/tmp/x"));
        assert_eq!(path, Path::new("/tmp/x/eplus-page-builder.json"));
    }
}
