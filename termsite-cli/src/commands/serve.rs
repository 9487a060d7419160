use anyhow::Result;
use termsite_core::{SiteConfig, StaticServer};

/// Run the development server until it fails or Ctrl-C is pressed
pub async fn run(config: SiteConfig) -> Result<()> {
    config.validate()?;
    super::init_logging(&config.logging, false)?;

    let server =
        StaticServer::from_config(&config.server)?.with_access_log(config.logging.access_log);

    tokio::select! {
        result = server.serve() => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutting down");
            Ok(())
        }
    }
}
