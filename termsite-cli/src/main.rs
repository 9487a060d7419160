//! termsite CLI - development server and tooling for the TermStation site.
//!
//! ```bash
//! termsite serve --port 8080
//! termsite render faq --highlight why
//! termsite simulate trace.json --format json
//! ```
//!
//! Settings come from `termsite.toml` (when present), then `TS_*` / `PORT`
//! environment variables, then the flags below.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use termsite_core::config::{SiteConfig, DEFAULT_CONFIG_FILE};

use commands::render::Page;
use commands::simulate::OutputFormat;

#[derive(Parser)]
#[command(name = "termsite", about = "TermStation site development server and tools", version)]
struct Cli {
    /// Config file; defaults are used when it does not exist
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Minimum log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (human, json, logfmt)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the document root over HTTP
    Serve {
        #[arg(long, short)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,

        /// Document root directory
        #[arg(long)]
        root: Option<PathBuf>,

        /// File below the root that is never served
        #[arg(long)]
        excluded_file: Option<String>,

        /// Log every request at info level
        #[arg(long)]
        access_log: bool,
    },

    /// Print the landing sections or the FAQ list as HTML
    Render {
        #[arg(value_enum, default_value_t = Page::Landing)]
        page: Page,

        #[arg(long)]
        sections: Option<PathBuf>,

        #[arg(long)]
        anchors: Option<PathBuf>,

        #[arg(long)]
        faq: Option<PathBuf>,

        /// FAQ fragment to render highlighted, with or without `#`
        #[arg(long)]
        highlight: Option<String>,

        /// Render every section and FAQ item already revealed
        #[arg(long)]
        reduced_motion: bool,
    },

    /// Replay a geometry trace through the fade engine
    Simulate {
        /// JSON trace file
        trace: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Override the trace's `--card-sticky-top` value, e.g. "72px"
        #[arg(long)]
        sticky_top: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SiteConfig::load_from(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    match cli.command {
        Commands::Serve { port, host, root, excluded_file, access_log } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(root) = root {
                config.server.doc_root = root;
            }
            if let Some(excluded) = excluded_file {
                config.server.excluded_file = excluded;
            }
            config.logging.access_log |= access_log;
            commands::serve::run(config).await
        }
        Commands::Render { page, sections, anchors, faq, highlight, reduced_motion } => {
            if let Some(path) = sections {
                config.content.sections = path;
            }
            if let Some(path) = anchors {
                config.content.anchors = path;
            }
            if let Some(path) = faq {
                config.content.faq = path;
            }
            commands::render::run(&config, page, highlight.as_deref(), reduced_motion)
        }
        Commands::Simulate { trace, format, sticky_top } => {
            commands::simulate::run(&config, &trace, format, sticky_top)
        }
    }
}
