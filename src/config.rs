use crate::Cli;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::theme;

/// Runtime settings. Explicit CLI flags win over the optional config file,
/// which wins over the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: String,
    pub mouse: bool,
    pub upgrade_check: bool,
    pub quit_after_secs: u64,
    pub update_interval_ms: u64,
}

impl Config {
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = Self::load_from_file().unwrap_or_default();

        if let Some(theme) = cli.theme {
            config.theme = theme;
        }
        if cli.no_mouse {
            config.mouse = false;
        }
        if cli.no_upgrade {
            config.upgrade_check = false;
        }
        if let Some(secs) = cli.quit_after {
            config.quit_after_secs = secs;
        }
        if let Some(ms) = cli.update_interval {
            config.update_interval_ms = ms;
        }

        Ok(config)
    }

    fn load_from_file() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    fn get_config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".config").join("scry").join("config.toml"))
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.max(1))
    }

    pub fn quit_after(&self) -> Option<Duration> {
        (self.quit_after_secs > 0).then(|| Duration::from_secs(self.quit_after_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: theme::DEFAULT_THEME.to_string(),
            mouse: true,
            upgrade_check: true,
            quit_after_secs: 0,
            update_interval_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cli() -> Cli {
        Cli {
            theme: None,
            no_mouse: false,
            no_upgrade: false,
            quit_after: None,
            update_interval: None,
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.theme, "parallax");
        assert!(config.mouse);
        assert!(config.upgrade_check);
        assert_eq!(config.quit_after_secs, 0);
        assert_eq!(config.update_interval_ms, 100);
        assert!(config.quit_after().is_none());
        assert_eq!(config.update_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli {
            theme: Some("monokai".to_string()),
            no_mouse: true,
            no_upgrade: true,
            quit_after: Some(5),
            update_interval: Some(250),
        };

        let config = Config::new(cli).expect("Failed to create config");
        assert_eq!(config.theme, "monokai");
        assert!(!config.mouse);
        assert!(!config.upgrade_check);
        assert_eq!(config.quit_after(), Some(Duration::from_secs(5)));
        assert_eq!(config.update_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_absent_flags_leave_defaults_alone() {
        let config = Config::new(empty_cli()).expect("Failed to create config");
        assert!(config.mouse);
        assert!(config.upgrade_check);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).expect("Failed to serialize config");
        let deserialized: Config = toml::from_str(&serialized).expect("Failed to deserialize config");

        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.mouse, deserialized.mouse);
        assert_eq!(config.update_interval_ms, deserialized.update_interval_ms);
    }
}
