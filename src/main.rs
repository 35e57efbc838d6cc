//! Chorus CLI entry point.

use anyhow::Result;
use chorus::cli::{commands, Cli, Commands};
use chorus::config::Settings;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("chorus={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Run { agents, transcript, input } => {
            commands::run_agents(agents, transcript.clone(), input.clone(), settings).await?;
        }

        Commands::Check { agents } => {
            commands::run_check(agents, settings)?;
        }

        Commands::Tools => {
            commands::run_tools(settings)?;
        }

        Commands::Validate { files } => {
            commands::run_validate(files)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
