// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use permitted_params_core::infrastructure::config::{
    AllowlistConfigManifest, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE,
};
use permitted_params_core::AllowlistRegistry;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective allowlists
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

pub fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. {}", DEFAULT_CONFIG_FILE);
        println!();
    }

    let registry = super::load_registry(config_override)?;
    let snapshot = registry.snapshot();

    println!("{}", "Effective allowlists:".bold());
    for kind in snapshot.kinds() {
        println!("  {}", kind.bold());
        for field in snapshot.fields_for(kind).iter() {
            println!("    - {}", field);
        }
    }

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating allowlist configuration...");

    let manifest = AllowlistConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    manifest
        .validate()
        .context("Configuration validation failed")?;

    // Dry run against a scratch registry so unknown kinds surface here.
    let added = manifest
        .apply_to(&AllowlistRegistry::with_builtin())
        .context("Configuration references an unknown allowlist kind")?;

    println!(
        "{}",
        format!("✓ Configuration is valid ({} new fields)", added).green()
    );

    Ok(())
}
