// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # promptforge CLI
//!
//! The `promptforge` binary drives the marketing-content pipeline in-process:
//! competitor analysis, prompt-idea generation and content generation.
//!
//! ## Commands
//!
//! - `promptforge analyze|ideas|generate` - One pipeline step
//! - `promptforge run` - All three steps in one process
//! - `promptforge list analyses|ideas|content` - Stored records
//! - `promptforge providers` - Effective provider settings
//! - `promptforge keys set|deactivate` - Managed API keys (database only)
//! - `promptforge config show|validate|generate` - Configuration management
//!
//! Without a configured database every run starts with empty in-memory
//! storage, so `ideas` and `generate` need ids from the same process; use
//! `run` in that case.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use promptforge_core::domain::pipeline_config::PipelineConfig;

mod commands;
mod embedded;

use commands::{ConfigCommand, KeysCommand, ListCommand, PipelineCommand};

/// promptforge - competitor analysis to marketing content
#[derive(Parser)]
#[command(name = "promptforge")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "PROMPTFORGE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the config file
    #[arg(long, global = true, env = "PROMPTFORGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Pipeline(PipelineCommand),

    /// Stored analyses, ideas and content
    #[command(name = "list")]
    List {
        #[command(subcommand)]
        command: ListCommand,
    },

    /// Show effective provider settings
    #[command(name = "providers")]
    Providers,

    /// Managed API keys
    #[command(name = "keys")]
    Keys {
        #[command(subcommand)]
        command: KeysCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = PipelineConfig::load_or_default(cli.config.clone()).context("Failed to load configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, &config.logging.format)?;
    tracing::debug!(
        providers = config.providers.len(),
        database = config.database.is_some(),
        "Configuration loaded"
    );

    match cli.command {
        Some(Commands::Pipeline(command)) => commands::pipeline::handle_command(command, &config, cli.json).await,
        Some(Commands::List { command }) => commands::list::handle_command(command, &config, cli.json).await,
        Some(Commands::Providers) => commands::providers::handle_command(&config, cli.json).await,
        Some(Commands::Keys { command }) => commands::keys::handle_command(command, &config).await,
        Some(Commands::Config { command }) => commands::config::handle_command(command, cli.config, config).await,
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
