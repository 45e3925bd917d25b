use anyhow::Result;
use clap::Parser;

use reverb_config::ConfigLoader;

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit level wins over the configured one; later initialization is a no-op
    if let Some(level) = &cli.log_level {
        reverb_logging::init_simple_tracing(level)?;
    }

    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file_name(path.to_string_lossy()),
        None => ConfigLoader::new(),
    };

    match cli.command {
        Commands::Orchestrate { event, tick } => commands::orchestrate(&loader, &event, tick).await,
        Commands::Consume { event } => commands::consume(&loader, &event).await,
        Commands::Config { config_cmd } => match config_cmd {
            ConfigCommands::Show => commands::config_show(&loader),
        },
    }
}
