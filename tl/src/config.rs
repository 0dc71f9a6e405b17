//! Traffic light configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SignalError;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".trafficlight.yml";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Phase cycle timing
    pub cycle: CycleConfig,

    /// Console observer settings
    pub observer: ObserverConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        self.cycle.validate().context("Invalid cycle configuration")?;
        if self.observer.poll_interval_ms == 0 {
            return Err(eyre::eyre!("observer.poll-interval-ms must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .trafficlight.yml
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/trafficlight/trafficlight.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("trafficlight").join("trafficlight.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Bounds of the randomized hold between toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Shortest hold in milliseconds (inclusive)
    #[serde(rename = "min-interval-ms")]
    pub min_interval_ms: u64,

    /// Longest hold in milliseconds (exclusive)
    #[serde(rename = "max-interval-ms")]
    pub max_interval_ms: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 4000,
            max_interval_ms: 6000,
        }
    }
}

impl CycleConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    /// Check that the bounds describe a non-empty range
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.min_interval_ms == 0 || self.min_interval_ms >= self.max_interval_ms {
            return Err(SignalError::InvalidInterval {
                min: self.min_interval(),
                max: self.max_interval(),
            });
        }
        Ok(())
    }
}

/// Settings for the console driver that watches a light
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// How often `run` samples the current phase
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Default bound for `wait`; unbounded when absent
    #[serde(rename = "wait-timeout-ms")]
    pub wait_timeout_ms: Option<u64>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            wait_timeout_ms: None,
        }
    }
}

impl ObserverConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cycle.min_interval(), Duration::from_millis(4000));
        assert_eq!(config.cycle.max_interval(), Duration::from_millis(6000));
        assert_eq!(config.observer.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.observer.wait_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "cycle:\n  min-interval-ms: 100\n  max-interval-ms: 200\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.cycle.min_interval_ms, 100);
        assert_eq!(config.cycle.max_interval_ms, 200);
        assert_eq!(config.observer, ObserverConfig::default());
    }

    #[test]
    fn test_wait_timeout_parsed() {
        let yaml = "observer:\n  wait-timeout-ms: 1500\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.observer.wait_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_cycle_validation() {
        let inverted = CycleConfig {
            min_interval_ms: 6000,
            max_interval_ms: 4000,
        };
        assert!(matches!(inverted.validate(), Err(SignalError::InvalidInterval { .. })));

        let zero = CycleConfig {
            min_interval_ms: 0,
            max_interval_ms: 10,
        };
        assert!(zero.validate().is_err());

        let mut config = Config::default();
        config.observer.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("light.yml");
        fs::write(&path, "cycle:\n  min-interval-ms: 10\n  max-interval-ms: 20\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.cycle.min_interval_ms, 10);
        assert_eq!(config.cycle.max_interval_ms, 20);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    #[serial]
    fn test_load_project_local_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(LOCAL_CONFIG_FILE),
            "observer:\n  poll-interval-ms: 5\n",
        )
        .unwrap();

        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let result = Config::load(None);
        std::env::set_current_dir(previous).unwrap();

        assert_eq!(result.unwrap().observer.poll_interval_ms, 5);
    }
}
