//! Runtime settings for an inspector session.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Settings for one connection and the fronts created on it.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```json
/// { "refresh_interval_ms": 250 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Auto-refresh poll interval for fronts.
    pub refresh_interval_ms: u64,
    /// Request channel capacity of the connection.
    pub channel_capacity: usize,
    /// Prefix for every actor id minted on the connection.
    pub actor_prefix: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 500,
            channel_capacity: 32,
            actor_prefix: "conn0.".to_string(),
        }
    }
}

impl WatchConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Both the poll interval and the channel capacity must be non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::Invalid("refresh_interval_ms must be non-zero".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be non-zero".into()));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WatchConfig::default();
        assert_eq!(config.refresh_interval(), Duration::from_millis(500));
        assert_eq!(config.channel_capacity, 32);
        assert_eq!(config.actor_prefix, "conn0.");
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: WatchConfig = serde_json::from_str(r#"{ "refresh_interval_ms": 100 }"#).unwrap();
        assert_eq!(config.refresh_interval_ms, 100);
        assert_eq!(config.channel_capacity, 32);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("state-watch-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "actor_prefix": "server1.conn3.", "channel_capacity": 8 }"#).unwrap();

        let config = WatchConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.actor_prefix, "server1.conn3.");
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.refresh_interval_ms, 500);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            WatchConfig::load("/nonexistent/state-watch.json"),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(
            serde_json::from_str::<WatchConfig>("{ not json").map_err(ConfigError::from),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let path = std::env::temp_dir().join(format!("state-watch-zero-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "refresh_interval_ms": 0 }"#).unwrap();

        let result = WatchConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        let no_capacity = WatchConfig {
            channel_capacity: 0,
            ..WatchConfig::default()
        };
        assert!(matches!(no_capacity.validate(), Err(ConfigError::Invalid(_))));
        assert!(WatchConfig::default().validate().is_ok());
    }
}
