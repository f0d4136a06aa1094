use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    reduce::DEFAULT_PERIODS_KEPT,
    rules::{RuleSet, Thresholds},
    source::nws::{DEFAULT_FORECAST_URL, DEFAULT_USER_AGENT},
};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// endpoint = "https://api.weather.gov/gridpoints/MKX/88,63/forecast"
/// periods_kept = 2
///
/// [thresholds]
/// hot = 75.0
/// cold = 50.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gridpoint forecast URL.
    pub endpoint: String,

    /// Overrides the default `weather-rules/<version>` User-Agent.
    pub user_agent: Option<String>,

    /// How many leading periods the rules see.
    pub periods_kept: usize,

    pub timeout_secs: u64,

    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_FORECAST_URL.to_string(),
            user_agent: None,
            periods_kept: DEFAULT_PERIODS_KEPT,
            timeout_secs: 30,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-rules", "weather-rules")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.endpoint)
            .with_context(|| format!("Endpoint is not a valid URL: {}", self.endpoint))?;

        if self.periods_kept == 0 {
            bail!("periods_kept must be at least 1");
        }

        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }

        Thresholds::new(self.thresholds.hot(), self.thresholds.cold())?;

        Ok(())
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rule_set(&self) -> RuleSet {
        RuleSet::new(self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().expect("defaults must validate");

        assert_eq!(cfg.endpoint, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.periods_kept, 2);
        assert_eq!(cfg.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.periods_kept = 3;
        cfg.user_agent = Some("my-station (ops@example.com)".into());
        cfg.thresholds = Thresholds::new(80.0, 50.0).unwrap();

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, cfg);
        assert_eq!(loaded.user_agent(), "my-station (ops@example.com)");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "periods_kept = 3\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.periods_kept, 3);
        assert_eq!(cfg.endpoint, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.thresholds, Thresholds::default());
    }

    #[test]
    fn rejects_empty_window() {
        let mut cfg = Config::default();
        cfg.periods_kept = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut cfg = Config::default();
        cfg.timeout_secs = 0;

        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn zero_timeout_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.timeout_secs = 0;

        assert!(cfg.save_to(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn rejects_bad_endpoint() {
        let mut cfg = Config::default();
        cfg.endpoint = "not a url".into();

        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("not a valid URL"));
    }

    #[test]
    fn inverted_thresholds_in_file_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[thresholds]\nhot = 10.0\ncold = 20.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        assert!(format!("{err:#}").contains("above hot threshold"));
    }

    #[test]
    fn zero_timeout_in_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
