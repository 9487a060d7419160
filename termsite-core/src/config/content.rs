//! Content configuration for the section and FAQ data files

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Where the renderer reads its content declarations from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Env: TS_SECTIONS
    pub sections: PathBuf,
    /// Env: TS_ANCHORS
    pub anchors: PathBuf,
    /// Env: TS_FAQ
    pub faq: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            sections: PathBuf::from("content/sections.json"),
            anchors: PathBuf::from("content/anchors.json"),
            faq: PathBuf::from("content/faq.json"),
        }
    }
}

impl ContentConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env_with(|key| env::var(key).ok());
    }

    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("TS_SECTIONS") {
            self.sections = PathBuf::from(path);
        }
        if let Some(path) = lookup("TS_ANCHORS") {
            self.anchors = PathBuf::from(path);
        }
        if let Some(path) = lookup("TS_FAQ") {
            self.faq = PathBuf::from(path);
        }
    }
}
