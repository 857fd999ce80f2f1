// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure layer: authorization oracle adapters and the YAML
//! allowlist configuration loader.

pub mod config;
pub mod oracle;
