// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `permit filter` - run one view over a JSON request body

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use permitted_params_core::infrastructure::oracle::{ActorId, Grant, GrantTable, OracleActor};
use permitted_params_core::{Action, AllowlistRegistry, ContextId, ParamFilter, Project, View};

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// View to filter through (see `permit views`)
    #[arg(long, value_name = "VIEW")]
    pub view: View,

    /// JSON input file, or `-` for stdin
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub input: PathBuf,

    /// Act as an administrator
    #[arg(long)]
    pub admin: bool,

    /// Grant an action on the context (repeatable)
    #[arg(long = "allow", value_name = "ACTION")]
    pub allow: Vec<Action>,

    /// Context (project) identifier the request targets
    #[arg(long, value_name = "ID")]
    pub context: Option<String>,

    /// Acting user identifier
    #[arg(long, value_name = "ID", default_value = "cli")]
    pub actor: String,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: FilterArgs, registry: &AllowlistRegistry) -> Result<()> {
    let raw = read_input(&args.input)?;
    let filtered = filter_value(&args, registry, &raw);

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&filtered)?
    } else {
        serde_json::to_string(&filtered)?
    };
    println!("{}", rendered);

    Ok(())
}

/// Filter `raw` as the actor described by `args` would see it.
pub fn filter_value(args: &FilterArgs, registry: &AllowlistRegistry, raw: &Value) -> Value {
    let actor_id = ActorId::new(args.actor.clone());
    let context = args.context.as_ref().map(|id| Project::new(id.as_str()));

    if context.is_none() && !args.allow.is_empty() {
        tracing::warn!("--allow has no effect without --context; permission-gated fields will be dropped");
    }

    let grants = GrantTable::from_iter(args.allow.iter().map(|action| Grant {
        actor: actor_id.clone(),
        action: *action,
        context: args.context.as_ref().map(|id| ContextId::new(id.as_str())),
    }));
    let actor = OracleActor::new(actor_id, args.admin, Arc::new(grants));

    let filter = ParamFilter::new(registry, raw, &actor);
    let context = context.as_ref().map(|project| project as &dyn permitted_params_core::Context);
    Value::Object(filter.filter(args.view, context))
}

fn read_input(path: &Path) -> Result<Value> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request body from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request body from {:?}", path))?
    };

    serde_json::from_str(&content).context("Request body is not valid JSON")
}
