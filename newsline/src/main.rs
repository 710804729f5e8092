/*
newsline - main.rs
Renders the feed document once to stdout/a file, or serves it over HTTP with `--serve`.
*/

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newsline::loader::load_page;
use newsline::render::{render, OutputFormat};
use newsline::server::launch_rocket;
use newsline::{PageState, TimelineOptions};

#[derive(Parser, Debug)]
#[command(name = "newsline", about = "Render a themed news feed as a latest/past timeline")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Feed document to render (overrides `data.path` from the config)
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    format: OutputFormat,

    /// Write the rendered page here instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Serve the timeline over HTTP instead of rendering once
    #[arg(long)]
    serve: bool,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Logs go to stderr so stdout only carries the rendered page
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    let data_path = args
        .data
        .unwrap_or_else(|| PathBuf::from(&config.data.path));

    if args.serve {
        return launch_rocket(Arc::new(config), data_path).await;
    }

    let options = TimelineOptions::from(&config.timeline);
    let page = load_page(&data_path, &options).await;
    match &page {
        PageState::Ready(timeline) => info!(
            points = timeline.point_count(),
            latest_themes = timeline.latest.len(),
            past_themes = timeline.past.len(),
            "timeline ready"
        ),
        PageState::Unavailable { reason } => error!(%reason, "news data could not be loaded"),
        PageState::Invalid { reason } => error!(%reason, "news data is not a valid list of themes"),
        PageState::Empty => error!("news data is empty"),
    }

    let rendered = render(&page, args.format, &config)?;
    match args.output {
        Some(path) => {
            tokio::fs::write(&path, rendered)
                .await
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(path = %path.display(), "page written");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
