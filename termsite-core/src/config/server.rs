//! Server configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server listening port
    /// Env: PORT
    /// Default: 3000
    pub port: u16,

    /// Server listening address
    /// Env: TS_HOST
    /// Default: "127.0.0.1"
    pub host: String,

    /// Directory all request paths are resolved against
    /// Env: TS_DOC_ROOT
    /// Default: "docs"
    pub doc_root: PathBuf,

    /// File (relative to the document root) that is never served
    /// Env: TS_EXCLUDED_FILE
    /// Default: "CNAME"
    pub excluded_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            doc_root: PathBuf::from("docs"),
            excluded_file: "CNAME".to_string(),
        }
    }
}

impl ServerConfig {
    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.port = other.port;
        self.host = other.host;
        self.doc_root = other.doc_root;
        self.excluded_file = other.excluded_file;
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        self.apply_env_with(|key| env::var(key).ok());
    }

    /// Apply overrides read through `lookup` instead of the process environment
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Zero or unparsable PORT keeps the configured port
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(0) | Err(_) => log::warn!("Ignoring PORT={:?}; keeping port {}", port, self.port),
                Ok(p) => self.port = p,
            }
        }

        if let Some(host) = lookup("TS_HOST") {
            self.host = host;
        }

        if let Some(root) = lookup("TS_DOC_ROOT") {
            self.doc_root = PathBuf::from(root);
        }

        if let Some(excluded) = lookup("TS_EXCLUDED_FILE") {
            self.excluded_file = excluded;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Invalid port: port must be between 1 and 65535");
        }

        if self.host.is_empty() {
            bail!("Invalid host: host cannot be empty");
        }

        if self.doc_root.as_os_str().is_empty() {
            bail!("Invalid doc_root: document root cannot be empty");
        }

        if self.excluded_file.is_empty() {
            bail!("Invalid excluded_file: cannot be empty");
        }

        let escapes = Path::new(&self.excluded_file)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            bail!(
                "Invalid excluded_file '{}': must be a path relative to the document root",
                self.excluded_file
            );
        }

        Ok(())
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
