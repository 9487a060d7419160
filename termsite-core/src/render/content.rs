//! Content declarations loaded from JSON
//!
//! Loading is forgiving: a file that is not a JSON array yields no entries, and
//! entries of the wrong shape are dropped instead of failing the whole file.
//! Only unreadable files and invalid JSON are errors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Why a content file could not be loaded
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One landing page section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub eyebrow: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
    /// Raw entries; incomplete ones still count towards the container
    #[serde(default, deserialize_with = "list")]
    pub actions: Vec<Option<ActionDescriptor>>,
    /// A single object or an array; `None` entries render a placeholder
    #[serde(default, deserialize_with = "one_or_many")]
    pub media: Vec<Option<MediaDescriptor>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    #[serde(default, deserialize_with = "text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub href: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub variant: Option<String>,
}

impl ActionDescriptor {
    pub fn is_ghost(&self) -> bool {
        self.variant.as_deref() == Some("ghost")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

// Anything that is not "video" renders as an image.
impl<'de> Deserialize<'de> for MediaKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("video") => MediaKind::Video,
            _ => MediaKind::Image,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(default, deserialize_with = "text")]
    pub src: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub muted: Option<bool>,
    #[serde(rename = "loop", default, deserialize_with = "flag")]
    pub looped: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub autoplay: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub controls: Option<bool>,
}

/// Hidden anchor emitted before the section at `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRule {
    pub index: i64,
    pub id: String,
}

impl AnchorRule {
    /// Negative indices and empty ids never match a section
    pub fn is_usable(&self) -> bool {
        self.index >= 0 && !self.id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,
    pub question: String,
    /// Trusted HTML
    pub answer: String,
}

pub fn load_sections<P: AsRef<Path>>(path: P) -> Result<Vec<SectionDescriptor>, ContentError> {
    load_entries(path.as_ref())
}

pub fn load_anchors<P: AsRef<Path>>(path: P) -> Result<Vec<AnchorRule>, ContentError> {
    load_entries(path.as_ref())
}

pub fn load_faq<P: AsRef<Path>>(path: P) -> Result<Vec<FaqItem>, ContentError> {
    load_entries(path.as_ref())
}

/// Parse a JSON document holding a list of entries
pub fn parse_entries<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(entries_from_value(value))
}

fn load_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ContentError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ContentError::Io { path: path.to_path_buf(), source })?;
    let entries = parse_entries(&content)
        .map_err(|source| ContentError::Json { path: path.to_path_buf(), source })?;
    log::debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

fn entries_from_value<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        log::debug!("Content is not a list, ignoring it");
        return Vec::new();
    };

    let total = items.len();
    let kept: Vec<T> = items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect();
    if kept.len() < total {
        log::debug!("Dropped {} malformed content entries", total - kept.len());
    }
    kept
}

// Non-empty strings only, everything else reads as absent.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool())
}

fn list<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(|v| serde_json::from_value(v).ok()).collect(),
        _ => Vec::new(),
    })
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(|v| serde_json::from_value(v).ok()).collect(),
        Value::Null | Value::Bool(false) => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        single => vec![serde_json::from_value(single).ok()],
    })
}
