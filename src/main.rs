use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use wongprime_dashboard::app::App;
use wongprime_dashboard::cli::{Cli, CliHandler};
use wongprime_dashboard::config::DashboardConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let config = DashboardConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(cli.api_url.as_deref());

    // Handle CLI commands
    if let Some(command) = cli.command {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(cli_level(cli.debug))
            .init();

        let handler = CliHandler::new(config, cli.config, cli.json)?;
        return handler.handle_command(command).await;
    }

    // Write to a file so log lines never land on the TUI
    let log_path = log_file_path();
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_max_level(log_level)
        .init();

    if cli.debug {
        tracing::info!("🐛 Debug mode enabled - verbose logging active");
    }
    tracing::info!("Starting dashboard against {}", config.api.base_url);

    let mut app = App::new(&config)?;
    let result = app.run().await;
    if let Err(e) = &result {
        tracing::error!("Dashboard exited with error: {:#}", e);
    }
    result
}

/// One-shot commands stay quiet unless debugging
fn cli_level(debug: bool) -> tracing::Level {
    if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    }
}

fn log_file_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("wongprime")
        .join("wongprime.log")
}
