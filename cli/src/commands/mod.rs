// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the permit CLI

pub mod config;
pub mod filter;
pub mod views;

pub use self::config::ConfigCommand;
pub use self::filter::FilterArgs;

use anyhow::{Context, Result};
use std::path::PathBuf;

use permitted_params_core::infrastructure::config::AllowlistConfigManifest;
use permitted_params_core::AllowlistRegistry;

/// Build the built-in registry and apply the discovered (or explicit)
/// allowlist manifest to it. Any configuration error aborts the command.
pub fn load_registry(config_path: Option<PathBuf>) -> Result<AllowlistRegistry> {
    let manifest = AllowlistConfigManifest::load_or_default(config_path)
        .context("Failed to load allowlist configuration")?;
    manifest
        .validate()
        .context("Allowlist configuration validation failed")?;

    let registry = AllowlistRegistry::with_builtin();
    let added = manifest
        .apply_to(&registry)
        .context("Failed to apply allowlist configuration")?;
    tracing::debug!(added, config = %manifest.metadata.name, "Allowlist configuration applied");

    Ok(registry)
}
