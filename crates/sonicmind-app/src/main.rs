mod cli;
mod commands;
mod setup;

use anyhow::Result;
use clap::Parser;
use sonicmind_core::config::AppConfig;
use sonicmind_core::lifecycle;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    lifecycle::init_tracing();

    let cli = Cli::parse();
    lifecycle::log_startup();
    let config = AppConfig::load_or_default(cli.config.as_deref());

    match cli.command {
        Commands::Run { text, json } => commands::run_typed(&config, text, json).await?,
        Commands::Speak { json } => commands::speak(&config, json).await?,
        Commands::Interactive => commands::interactive(&config).await?,
        Commands::Classify { text } => commands::classify(&config, text).await?,
    }

    lifecycle::log_shutdown();
    Ok(())
}
