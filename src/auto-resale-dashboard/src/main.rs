//! Auto Resale Dashboard — marketing and sales reporting over CRM and ad-spend exports.
//!
//! Serves the dashboard over HTTP, or renders it once to a file.

use clap::{Parser, Subcommand};
use resale_api::{render_page, ApiServer, DashboardService};
use resale_core::config::AppConfig;
use resale_reporting::{DashboardBuilder, Metric};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "auto-resale-dashboard")]
#[command(about = "Marketing & sales dashboard over CRM, Google Ads and Meta Ads exports")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long, env = "AUTO_RESALE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the CSV exports (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard over HTTP (default)
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// HTTP port (overrides config)
        #[arg(long)]
        http_port: Option<u16>,

        /// Expose Prometheus metrics on the configured metrics port
        #[arg(long, default_value_t = false)]
        metrics: bool,
    },
    /// Render the dashboard once as a standalone HTML page
    Render {
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the key metrics and section warnings as JSON
    Summary,
}

#[derive(Serialize)]
struct Summary<'a> {
    metrics: &'a [Metric],
    warnings: Vec<&'a str>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `render` can write the page to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "auto_resale_dashboard=info,resale_api=info,resale_reporting=info,tower_http=info"
                    .into()
            }),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(Some(path))?,
        None => AppConfig::load(None).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }),
    };

    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }

    let command = cli.command.unwrap_or(Command::Serve {
        host: None,
        http_port: None,
        metrics: false,
    });

    match command {
        Command::Serve {
            host,
            http_port,
            metrics,
        } => {
            if let Some(host) = host {
                config.api.host = host;
            }
            if let Some(port) = http_port {
                config.api.http_port = port;
            }
            config.metrics.enabled |= metrics;
            serve(config).await
        }
        Command::Render { output } => {
            let dashboard = DashboardBuilder::new(config.dashboard.clone()).load(&config.data)?;
            let html = render_page(&dashboard)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    info!(path = %path.display(), "Dashboard written");
                }
                None => print!("{html}"),
            }
            Ok(())
        }
        Command::Summary => {
            let dashboard = DashboardBuilder::new(config.dashboard.clone()).load(&config.data)?;
            let summary = Summary {
                metrics: &dashboard.metrics,
                warnings: dashboard.warnings(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!(
        data_dir = %config.data.dir.display(),
        http_port = config.api.http_port,
        reload_each_request = config.dashboard.reload_each_request,
        "Auto Resale Dashboard starting up"
    );

    let service = Arc::new(DashboardService::new(&config));

    // Surface missing or malformed exports at startup; the server still
    // comes up and reports the failure on each page view.
    if let Err(e) = service.reload() {
        warn!(error = %e, "Initial data load failed");
    }

    let api_server = ApiServer::new(config.clone(), service);

    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics() {
            warn!(error = %e, "Failed to start metrics exporter");
        }
    }

    api_server.start_http().await
}
