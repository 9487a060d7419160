//! Log formatting options for different output styles

use crate::logging::destinations::LogEntry;
use std::str::FromStr;

/// How logs should be formatted
#[derive(Clone, Debug, PartialEq)]
pub enum LogFormat {
    /// Structured JSON format
    /// Example: {"timestamp":"2024-01-15T10:30:00Z","level":"INFO","message":"GET / 200","target":"termsite_core::http::server"}
    Json,

    /// Human-readable format (development default)
    /// Example: 2024-01-15 10:30:00.000 INFO  [termsite_core::http::server] GET / 200
    Human,

    /// Logfmt format (key=value pairs)
    /// Example: timestamp=2024-01-15T10:30:00Z level=INFO target=termsite_core::http::server message="GET / 200"
    Logfmt,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "human" | "pretty" => Ok(LogFormat::Human),
            "logfmt" => Ok(LogFormat::Logfmt),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl LogFormat {
    /// Format a log entry according to this format
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
            LogFormat::Logfmt => format_logfmt(entry),
        }
    }
}

fn level_label(entry: &LogEntry) -> String {
    format!("{:?}", entry.level).to_uppercase()
}

fn field_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = serde_json::Map::new();

    json.insert("timestamp".to_string(), entry.timestamp.to_rfc3339().into());
    json.insert("level".to_string(), level_label(entry).into());
    json.insert("message".to_string(), entry.message.clone().into());
    json.insert("target".to_string(), entry.target.clone().into());

    if let Some(location) = &entry.location {
        json.insert("file".to_string(), location.file.clone().into());
        json.insert("line".to_string(), location.line.into());
    }

    for (key, value) in &entry.fields {
        json.insert(key.clone(), value.clone());
    }

    serde_json::Value::Object(json).to_string()
}

fn format_human(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
    let mut message =
        format!("{} {:5} [{}] {}", timestamp, level_label(entry), entry.target, entry.message);

    let mut keys: Vec<&String> = entry.fields.keys().collect();
    keys.sort();
    for key in keys {
        message.push_str(&format!(" {}={}", key, field_text(&entry.fields[key])));
    }

    message
}

fn format_logfmt(entry: &LogEntry) -> String {
    let quote = |s: &str| format!("\"{}\"", s.replace('"', "\\\""));

    let mut parts = vec![
        format!("timestamp={}", entry.timestamp.to_rfc3339()),
        format!("level={}", level_label(entry)),
        format!("target={}", entry.target),
        format!("message={}", quote(&entry.message)),
    ];

    if let Some(location) = &entry.location {
        parts.push(format!("file={}", quote(&location.file)));
        parts.push(format!("line={}", location.line));
    }

    let mut keys: Vec<&String> = entry.fields.keys().collect();
    keys.sort();
    for key in keys {
        let value = match &entry.fields[key] {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => quote(&field_text(other)),
        };
        parts.push(format!("{}={}", key, value));
    }

    parts.join(" ")
}
