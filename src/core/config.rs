use crate::core::dirs::get_config_directory;
use crate::core::error::{Result, TimelineError};
use crate::core::playback::PlaySpeed;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User settings, stored as JSON in `<config dir>/git-timeline/config.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Speed a freshly opened repository plays at; rounded down to 1, 2, 4, 8, 16 or 32.
    pub default_play_speed: u32,
    /// Time between two commits at speed 1.
    pub tick_interval_ms: u64,
    /// Commits per page served by the git provider.
    pub page_size: usize,
    /// File tree viewers created for every opened repository.
    pub initial_viewers: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            default_play_speed: PlaySpeed::default().get(),
            tick_interval_ms: 1000,
            page_size: 20,
            initial_viewers: 1,
        }
    }
}

impl TimelineConfig {
    pub fn config_file() -> Result<PathBuf> {
        Ok(get_config_directory()?.join("config.json"))
    }

    /// Load the user's config file, falling back to defaults when there is none.
    pub fn load_or_default() -> Result<Self> {
        let config_file = Self::config_file()?;
        if config_file.exists() {
            Self::load_from(&config_file)
        } else {
            log::debug!("No config at {}, using defaults", config_file.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TimelineError::config_read_failed(path, e))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| TimelineError::config_parse_failed(path, e))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn play_speed(&self) -> PlaySpeed {
        PlaySpeed::clamped(self.default_play_speed)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TimelineConfig::default();
        assert_eq!(config.play_speed().get(), 4);
        assert_eq!(config.page_size(), 20);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "page_size": 5, "default_play_speed": 10 }"#)?;

        let config = TimelineConfig::load_from(&path)?;
        assert_eq!(config.page_size, 5);
        assert_eq!(config.play_speed().get(), 8);
        assert_eq!(config.tick_interval_ms, 1000);
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("config.json");
        let config = TimelineConfig {
            initial_viewers: 2,
            ..TimelineConfig::default()
        };

        config.save_to(&path)?;
        assert_eq!(TimelineConfig::load_from(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_reported_with_path() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope")?;

        let err = TimelineConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, TimelineError::ConfigParseFailed { .. }));
        Ok(())
    }
}
