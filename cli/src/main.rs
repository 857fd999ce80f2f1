// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # `permit` — Permitted Params CLI
//!
//! Runs the allowlisting engine against a JSON request body, so operators can
//! see exactly which fields a given actor may set through a given view.
//!
//! ## Commands
//!
//! - `permit filter --view <VIEW>` - Filter JSON from a file or stdin
//! - `permit views` - List every view with its section, gates and fields
//! - `permit config show|validate` - Inspect allowlist configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use permitted_params::commands::{self, ConfigCommand, FilterArgs};

/// Scope request parameters to what an actor may set
#[derive(Parser)]
#[command(name = "permit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Allowlist configuration manifest applied before any command
    #[arg(
        short,
        long,
        global = true,
        env = "PERMITTED_PARAMS_CONFIG",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PERMIT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a JSON request body through one view
    #[command(name = "filter")]
    Filter(FilterArgs),

    /// List available views
    #[command(name = "views")]
    Views,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Filter(args) => {
            let registry = commands::load_registry(cli.config)?;
            commands::filter::run(args, &registry)
        }
        Commands::Views => {
            let registry = commands::load_registry(cli.config)?;
            commands::views::run(&registry)
        }
        Commands::Config { command } => commands::config::handle_command(command, cli.config),
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
