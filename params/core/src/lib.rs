// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `permitted-params-core` — Request Parameter Allowlisting
//!
//! Scopes untrusted, nested request parameters down to the fields an actor
//! may set on a target entity through one mutation path.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `Actor`, `View`, `AllowlistRegistry`, custom field shape rules |
//! | [`application`] | Application | `ParamFilter` per-request accessors |
//! | [`infrastructure`] | Infrastructure | oracle adapters, YAML allowlist config |
//!
//! ## Usage
//!
//! ```
//! use permitted_params_core::{AllowlistRegistry, ParamFilter, Project};
//! use permitted_params_core::infrastructure::oracle::{ActorId, GrantTable, OracleActor};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = AllowlistRegistry::with_builtin();
//! let actor = OracleActor::new(ActorId::new("alice"), false, Arc::new(GrantTable::new()));
//! let params = json!({ "work_package": { "subject": "Fix it", "author_id": "1" } });
//!
//! let filtered = ParamFilter::new(&registry, &params, &actor)
//!     .new_work_package(Some(&Project::new("demo")));
//! assert_eq!(serde_json::Value::Object(filtered), json!({ "subject": "Fix it" }));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::param_filter::{ParamFilter, Params};
pub use domain::actor::{Action, Actor, Context, ContextId, Project};
pub use domain::registry::{AllowlistRegistry, FieldSet, RegistryError, RegistrySnapshot};
pub use domain::view::{Gate, View, ViewPolicy};
