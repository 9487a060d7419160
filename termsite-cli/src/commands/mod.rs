pub mod render;
pub mod serve;
pub mod simulate;

use termsite_core::config::LogSettings;

/// Install the logger; `stderr_only` keeps stdout free for command output
pub fn init_logging(settings: &LogSettings, stderr_only: bool) -> anyhow::Result<()> {
    let mut config = settings.to_logging_config()?;
    if stderr_only {
        config = config.stderr_only();
    }
    termsite_core::logging::init_logging(&config)
}
