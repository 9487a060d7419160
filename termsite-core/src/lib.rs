//! termsite - Core
//!
//! Everything behind the TermStation marketing site that is more than markup:
//! a small development file server and the logic that drives the landing page.
//!
//! # Overview
//!
//! The crate is split into two independent halves that share no runtime state:
//!
//! - [`http`] - a hyper-based static file server rooted at a document directory,
//!   with traversal guards, a hidden hosting marker file and extension-based
//!   content types.
//! - [`fade`] - the scroll-driven card fade. Each frame turns viewport geometry
//!   into a per-card opacity with direction-aware hysteresis, so a card dissolves
//!   once per direction change instead of flickering.
//!
//! Around them sit [`render`] (section/FAQ descriptors to a view tree), [`config`]
//! (defaults, TOML file, environment) and [`logging`] (a `log` backend).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use termsite_core::config::SiteConfig;
//! use termsite_core::http::StaticServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SiteConfig::load()?;
//!     StaticServer::from_config(&config.server)?.serve().await
//! }
//! ```

pub mod config; // Layered configuration (defaults, TOML, env)
pub mod fade; // Scroll-coverage fade engine
pub mod http; // Static file server on hyper
pub mod logging; // `log` backend with human/json/logfmt output
pub mod render; // Section and FAQ view construction

pub use config::SiteConfig;
pub use fade::{CardFrame, FadeConfig, FadeEngine};
pub use http::{ServeError, StaticServer};

/// Result of the crate's content-driven operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for termsite operations that span modules
///
/// The server answers its own [`ServeError`]s per request; configuration and
/// trace loading report through `anyhow` at the edges.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Content files could not be loaded
    #[error("Content error: {0}")]
    Content(#[from] render::ContentError),
}
