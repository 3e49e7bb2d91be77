use std::time::Duration;

use thiserror::Error;

pub const LOG_FORMAT_ENV: &str = "NOTIFICATION_LOG_FORMAT";
pub const RESPONSE_TIMEOUT_ENV: &str = "NOTIFICATION_RESPONSE_TIMEOUT_SECS";
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be 'json' or 'text', got '{value}'")]
    InvalidLogFormat { key: &'static str, value: String },
    #[error("{key} must be a positive integer number of seconds, got '{value}'")]
    InvalidTimeout { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub log_format: LogFormat,
    pub response_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            response_timeout: Duration::from_secs(DEFAULT_RESPONSE_TIMEOUT_SECS),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; blank values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_format = match read(LOG_FORMAT_ENV) {
            None => LogFormat::default(),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" => LogFormat::Text,
                _ => {
                    return Err(ConfigError::InvalidLogFormat {
                        key: LOG_FORMAT_ENV,
                        value,
                    })
                }
            },
        };

        let response_timeout = match read(RESPONSE_TIMEOUT_ENV) {
            None => Duration::from_secs(DEFAULT_RESPONSE_TIMEOUT_SECS),
            Some(value) => match value.parse::<u64>() {
                Ok(seconds) if seconds > 0 => Duration::from_secs(seconds),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        key: RESPONSE_TIMEOUT_ENV,
                        value,
                    })
                }
            },
        };

        Ok(Self {
            log_format,
            response_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<RuntimeConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).expect("defaults should load");
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.response_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            (LOG_FORMAT_ENV, "Text"),
            (RESPONSE_TIMEOUT_ENV, " 5 "),
        ])
        .expect("overrides should load");

        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.response_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(LOG_FORMAT_ENV, "  "), (RESPONSE_TIMEOUT_ENV, "")])
            .expect("blank values should load");
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn rejects_unknown_log_format() {
        let error = config_from(&[(LOG_FORMAT_ENV, "yaml")]).expect_err("yaml is not supported");
        assert_eq!(
            error,
            ConfigError::InvalidLogFormat {
                key: LOG_FORMAT_ENV,
                value: "yaml".to_string(),
            }
        );
    }

    #[test]
    fn rejects_zero_and_non_numeric_timeouts() {
        for raw in ["0", "-3", "soon"] {
            let error = config_from(&[(RESPONSE_TIMEOUT_ENV, raw)])
                .expect_err("invalid timeout should fail");
            assert!(error.to_string().contains(RESPONSE_TIMEOUT_ENV));
        }
    }
}
