//! Logging configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::logging::{LogFormat, LogLevel, LoggingConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Env: TS_LOG_LEVEL
    pub level: String,
    /// `human`, `json` or `logfmt`
    /// Env: TS_LOG_FORMAT
    pub format: String,
    /// Log every request at info instead of debug
    /// Env: TS_ACCESS_LOG
    pub access_log: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string(), access_log: false }
    }
}

impl LogSettings {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env_with(|key| env::var(key).ok());
    }

    /// Apply overrides read through `lookup` instead of the process environment
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("TS_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(format) = lookup("TS_LOG_FORMAT") {
            self.format = format;
        }
        if let Some(flag) = lookup("TS_ACCESS_LOG") {
            self.access_log = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.parsed_level()?;
        self.parsed_format()?;
        Ok(())
    }

    fn parsed_level(&self) -> Result<LogLevel> {
        self.level.parse().map_err(|e: String| anyhow!("Invalid logging.level: {}", e))
    }

    fn parsed_format(&self) -> Result<LogFormat> {
        self.format.parse().map_err(|e: String| anyhow!("Invalid logging.format: {}", e))
    }

    /// Build the runtime logger configuration from these settings
    pub fn to_logging_config(&self) -> Result<LoggingConfig> {
        let format = self.parsed_format()?;
        let config = LoggingConfig::default()
            .with_level(self.parsed_level()?)
            .with_format(format.clone());

        // Machine-read formats carry the service name.
        Ok(match format {
            LogFormat::Human => config,
            LogFormat::Json | LogFormat::Logfmt => config.with_context_field("service", "termsite"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_rejected() {
        let settings = LogSettings { level: "loud".to_string(), ..Default::default() };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_to_logging_config() {
        let settings = LogSettings {
            level: "debug".to_string(),
            format: "json".to_string(),
            access_log: true,
        };
        let config = settings.to_logging_config().unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.context_fields.get("service").map(String::as_str), Some("termsite"));

        let human = LogSettings::default().to_logging_config().unwrap();
        assert!(human.context_fields.is_empty());
    }
}
