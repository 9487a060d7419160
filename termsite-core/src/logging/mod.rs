//! termsite logging
//!
//! A small backend for the standard `log` crate. Configure it once at startup,
//! then use `log::info!`, `log::debug!` and friends anywhere.
//!
//! # Example
//!
//! ```rust,no_run
//! use termsite_core::logging::{LoggingConfig, LogFormat};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Logfmt)
//!     .with_context_field("service", "termsite");
//!
//! termsite_core::logging::init_logging(&config)?;
//! log::info!("Server starting on port {}", 3000);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod destinations;
pub mod formatter;

pub use config::{LogLevel, LoggingConfig};
pub use destinations::{LogEntry, LogOutput};
pub use formatter::LogFormat;

use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the termsite logger
///
/// Safe to call multiple times; only the first call installs a logger.
/// Returns an error when another `log` backend was installed first.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = install(config);
    });
    result
}

fn install(config: &LoggingConfig) -> anyhow::Result<()> {
    let logger = SiteLogger::new(config.clone());
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(config.level.to_filter());
    Ok(())
}

/// `log::Log` implementation writing formatted entries to the configured outputs
struct SiteLogger {
    config: LoggingConfig,
}

impl SiteLogger {
    fn new(mut config: LoggingConfig) -> Self {
        if config.outputs.is_empty() {
            config.outputs.push(LogOutput::Stdout { format: None });
        }
        Self { config }
    }

    fn write_to(&self, output: &LogOutput, entry: &LogEntry) -> std::io::Result<()> {
        match output {
            LogOutput::Stdout { format } => {
                let line = format.as_ref().unwrap_or(&self.config.format).format_entry(entry);
                writeln!(std::io::stdout().lock(), "{}", line)
            }
            LogOutput::Stderr { format } => {
                let line = format.as_ref().unwrap_or(&self.config.format).format_entry(entry);
                writeln!(std::io::stderr().lock(), "{}", line)
            }
        }
    }
}

impl log::Log for SiteLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::from(self.config.level.clone())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::from_log_record(record, &self.config);
        for output in &self.config.outputs {
            let _ = self.write_to(output, &entry);
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}
