//! Log output destinations and the structured entry they receive

use crate::logging::LogFormat;
use std::collections::HashMap;

/// Where logs should be sent
#[derive(Clone, Debug, PartialEq)]
pub enum LogOutput {
    /// Write to stdout
    Stdout {
        /// Override the default format for this output
        format: Option<LogFormat>,
    },
    /// Write to stderr
    Stderr {
        /// Override the default format for this output
        format: Option<LogFormat>,
    },
}

/// A structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: crate::logging::LogLevel,
    pub message: String,
    /// Target (usually module path)
    pub target: String,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    /// Source file and line number
    pub location: Option<LogLocation>,
}

#[derive(Debug, Clone)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
}

impl LogEntry {
    pub fn new(level: crate::logging::LogLevel, message: String, target: String) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            level,
            message,
            target,
            fields: HashMap::new(),
            location: None,
        }
    }

    /// Create a LogEntry from a standard log::Record
    pub fn from_log_record(record: &log::Record, config: &crate::logging::LoggingConfig) -> Self {
        let mut entry = Self::new(
            record.level().into(),
            record.args().to_string(),
            record.target().to_string(),
        );

        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            entry.location = Some(LogLocation { file: file.to_string(), line });
        }

        for (key, value) in &config.context_fields {
            entry.fields.insert(key.clone(), serde_json::Value::String(value.clone()));
        }

        entry
    }

    /// Add a structured field to the log entry
    pub fn with_field(mut self, key: &str, value: serde_json::Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }
}
