// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `permit views` - list the view catalogue

use anyhow::Result;
use colored::Colorize;

use permitted_params_core::domain::custom_fields::CUSTOM_FIELD_VALUES;
use permitted_params_core::{AllowlistRegistry, View};

pub fn run(registry: &AllowlistRegistry) -> Result<()> {
    let snapshot = registry.snapshot();

    println!("{:<28} {:<22} {}", "VIEW", "SECTION", "GATE");
    for view in View::ALL {
        let policy = view.policy();
        let gate = policy
            .view_gate
            .map(|gate| gate.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!("{:<28} {:<22} {}", view.as_str().bold(), policy.section, gate);
        println!("    {}", describe_fields(view, &snapshot.fields_for(policy.registry_kind)).dimmed());
    }

    Ok(())
}

fn describe_fields(view: View, fields: &permitted_params_core::FieldSet) -> String {
    let policy = view.policy();
    let mut parts: Vec<String> = fields.iter().map(str::to_string).collect();
    parts.extend(
        policy
            .gated_fields
            .iter()
            .map(|gated| format!("{} [{}]", gated.field, gated.gate)),
    );
    if policy.custom_field_values {
        parts.push(format!("{CUSTOM_FIELD_VALUES} {{<id>: <value>}}"));
    }
    parts.join(", ")
}
