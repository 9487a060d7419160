//! Runtime logger settings

use crate::logging::{LogFormat, LogOutput};
use std::collections::HashMap;
use std::str::FromStr;

/// Runtime logging configuration
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Minimum log level to capture
    pub level: LogLevel,
    /// Where logs should be sent
    pub outputs: Vec<LogOutput>,
    /// Default format for all outputs (can be overridden per output)
    pub format: LogFormat,
    /// Context fields added to every log entry
    pub context_fields: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            outputs: vec![LogOutput::Stdout { format: None }],
            format: LogFormat::Human,
            context_fields: HashMap::new(),
        }
    }
}

/// Severity, most severe first; maps one-to-one onto `log::Level`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(&self) -> log::LevelFilter {
        log::Level::from(self.clone()).to_level_filter()
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

impl LoggingConfig {
    /// Add a field that appears in every entry, e.g. `service=termsite`
    pub fn with_context_field(mut self, key: &str, value: &str) -> Self {
        self.context_fields.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the default format and drop per-output overrides
    pub fn with_format(mut self, format: LogFormat) -> Self {
        for output in &mut self.outputs {
            match output {
                LogOutput::Stdout { format } | LogOutput::Stderr { format } => *format = None,
            }
        }
        self.format = format;
        self
    }

    /// Route every output to stderr so stdout carries only command output
    pub fn stderr_only(mut self) -> Self {
        self.outputs = self
            .outputs
            .into_iter()
            .map(|output| match output {
                LogOutput::Stdout { format } | LogOutput::Stderr { format } => LogOutput::Stderr { format },
            })
            .collect();
        self.outputs.dedup();
        if self.outputs.is_empty() {
            self.outputs.push(LogOutput::Stderr { format: None });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_write_human_to_stdout() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.outputs, vec![LogOutput::Stdout { format: None }]);
    }

    #[test]
    fn test_builder_chain() {
        let config = LoggingConfig::default()
            .with_context_field("service", "termsite")
            .with_level(LogLevel::Debug);

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.context_fields.get("service"), Some(&"termsite".to_string()));
    }

    #[test]
    fn test_with_format_clears_overrides() {
        let config = LoggingConfig {
            outputs: vec![LogOutput::Stderr { format: Some(LogFormat::Json) }],
            ..Default::default()
        }
        .with_format(LogFormat::Logfmt);
        assert!(matches!(config.outputs[0], LogOutput::Stderr { format: None }));
        assert_eq!(config.format, LogFormat::Logfmt);
    }

    #[test]
    fn test_stderr_only() {
        let config = LoggingConfig::default().stderr_only();
        assert_eq!(config.outputs, vec![LogOutput::Stderr { format: None }]);

        let config = LoggingConfig { outputs: Vec::new(), ..Default::default() }.stderr_only();
        assert_eq!(config.outputs.len(), 1);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" trace ".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
