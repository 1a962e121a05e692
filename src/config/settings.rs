use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::ROLLING_WINDOW_DAYS;

fn default_window_days() -> u32 {
    ROLLING_WINDOW_DAYS
}
fn default_tick_rate_ms() -> u64 {
    500
}
fn default_week_days() -> u32 {
    7
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Overrides `<data dir>/habittrack.db`
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Days scanned for the cross-habit streak and the rolling completion rate
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// Days shown in the weekly calendar panel
    #[serde(default = "default_week_days")]
    pub week_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            week_days: default_week_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "habittrack")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Configured database path, or the default one in the data directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("habittrack.db")),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.stats.window_days == 0 {
            bail!("stats.window_days must be at least 1");
        }
        if self.dashboard.week_days == 0 {
            bail!("dashboard.week_days must be at least 1");
        }
        Ok(())
    }

    /// Create the parent directory of the database file.
    pub fn ensure_db_dir(&self) -> Result<PathBuf> {
        let path = self.db_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating data directory {:?}", parent))?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.stats.window_days, 30);
        assert_eq!(config.dashboard.tick_rate_ms, 500);
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn partial_file_keeps_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[stats]\nwindow_days = 14\n\n[storage]\ndb_path = \"/tmp/h.db\"\n")
            .unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.stats.window_days, 14);
        assert_eq!(config.dashboard.week_days, 7);
        assert_eq!(config.db_path().unwrap(), PathBuf::from("/tmp/h.db"));
    }

    #[test]
    fn zero_window_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[stats]\nwindow_days = 0\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.dashboard.tick_rate_ms = 250;
        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.dashboard.tick_rate_ms, 250);
    }
}
