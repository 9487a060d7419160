//! Configuration system for termsite
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Code / CLI flags** - applied by the caller after loading
//! 2. **Environment Variables** - override file config
//! 3. **Config File** (`termsite.toml`) - override defaults
//! 4. **Defaults** - lowest priority
//!
//! # Example
//!
//! ```no_run
//! use termsite_core::config::SiteConfig;
//!
//! // Load with full supersedence
//! let config = SiteConfig::load()?;
//!
//! // Or load from a specific file
//! let config = SiteConfig::load_from("site/termsite.toml")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod content;
pub mod fade;
pub mod logging;
pub mod server;

pub use content::ContentConfig;
pub use fade::FadeSettings;
pub use logging::LogSettings;
pub use server::ServerConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file looked up by [`SiteConfig::load`]
pub const DEFAULT_CONFIG_FILE: &str = "termsite.toml";

/// Complete termsite configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub logging: LogSettings,
    pub fade: FadeSettings,
    pub content: ContentConfig,
}

impl SiteConfig {
    /// Load configuration with full supersedence chain
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (termsite.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file, falling back to defaults when it is absent
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Parse configuration from TOML text; missing sections keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.server.merge(other.server);
        self.logging.merge(other.logging);
        self.fade.merge(other.fade);
        self.content.merge(other.content);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup`; tests pass a map here so they
    /// never touch the shared process environment
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.server.apply_env_with(&lookup);
        self.logging.apply_env_with(&lookup);
        self.fade.apply_env_with(&lookup);
        self.content.apply_env_with(&lookup);
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.logging.validate()?;
        self.fade.validate()?;
        Ok(())
    }
}
