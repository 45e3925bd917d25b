//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Replay captured production traffic against a target", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one orchestrator tick and print the plan
    Orchestrate {
        /// JSON file holding the orchestrator event
        #[arg(long, value_name = "FILE")]
        event: PathBuf,

        /// Scheduling tick, overriding the one in the event
        #[arg(long, value_name = "N")]
        tick: Option<u64>,
    },

    /// Replay the slice of one work descriptor (or a list of them)
    Consume {
        /// JSON file holding a work descriptor or a descriptor list
        #[arg(long, value_name = "FILE")]
        event: PathBuf,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration resolved for the current stage
    Show,
}
