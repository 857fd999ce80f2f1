// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Param Filter
//!
//! The trust boundary between client-supplied request data and the domain
//! layer. A [`ParamFilter`] is built once per request from the raw params and
//! the acting [`Actor`], then asked for one or more [`View`]s.
//!
//! ## Filtering pipeline
//!
//! ```text
//! raw params ─► section at ViewPolicy::section (absent ⇒ {})
//!            ─► view gate (fails ⇒ {})
//!            ─► per key, in input order:
//!                 custom_field_values → shape filter (omitted if empty)
//!                 registry allowlist  → passthrough
//!                 gated field         → passthrough iff gate passes now
//!                 anything else       → dropped
//! ```
//!
//! Filtering is total over arbitrary input. The only side effects are the
//! reads performed by `Actor::allowed_to`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::actor::{Actor, Context};
use crate::domain::custom_fields::{filter_custom_field_values, CUSTOM_FIELD_VALUES};
use crate::domain::registry::{AllowlistRegistry, RegistrySnapshot};
use crate::domain::view::{Gate, View, ViewPolicy};

/// Filtered view output: a plain JSON object in input key order.
pub type Params = Map<String, Value>;

/// Per-request parameter filter.
///
/// Holds only its constructor arguments. Context is supplied per call since
/// one request may filter several views against different targets.
pub struct ParamFilter<'a> {
    registry: &'a AllowlistRegistry,
    params: &'a Value,
    actor: &'a dyn Actor,
}

impl<'a> ParamFilter<'a> {
    pub fn new(registry: &'a AllowlistRegistry, params: &'a Value, actor: &'a dyn Actor) -> Self {
        Self {
            registry,
            params,
            actor,
        }
    }

    /// Filter the section belonging to `view`.
    pub fn filter(&self, view: View, context: Option<&dyn Context>) -> Params {
        let policy = view.policy();

        let Some(section) = self.params.get(policy.section).and_then(Value::as_object) else {
            return Params::new();
        };

        if let Some(gate) = policy.view_gate {
            if !self.passes(gate, context) {
                debug!(view = %view, gate = %gate, "View gate denied, dropping section");
                return Params::new();
            }
        }

        // One snapshot per call so a concurrent registration cannot change
        // the allowlist halfway through a section.
        let allowlist = self.registry.snapshot();
        let mut permitted = Params::new();
        let mut dropped: Vec<&str> = Vec::new();

        for (key, value) in section {
            if key == CUSTOM_FIELD_VALUES {
                if self.accepts_custom_field_values(&policy, &allowlist) {
                    if let Some(values) = filter_custom_field_values(value) {
                        permitted.insert(key.clone(), Value::Object(values));
                    }
                } else {
                    dropped.push(key.as_str());
                }
                continue;
            }

            if allowlist.permits(policy.registry_kind, key) || self.gated_field_passes(&policy, key, context) {
                permitted.insert(key.clone(), value.clone());
            } else {
                dropped.push(key.as_str());
            }
        }

        if !dropped.is_empty() {
            debug!(view = %view, dropped = ?dropped, "Unpermitted parameters dropped");
        }

        permitted
    }

    fn accepts_custom_field_values(&self, policy: &ViewPolicy, allowlist: &RegistrySnapshot) -> bool {
        policy.custom_field_values || allowlist.permits(policy.registry_kind, CUSTOM_FIELD_VALUES)
    }

    fn gated_field_passes(&self, policy: &ViewPolicy, key: &str, context: Option<&dyn Context>) -> bool {
        policy
            .gated_fields
            .iter()
            .filter(|gated| gated.field == key)
            .any(|gated| self.passes(gated.gate, context))
    }

    fn passes(&self, gate: Gate, context: Option<&dyn Context>) -> bool {
        match gate {
            Gate::Administrator => self.actor.is_admin(),
            Gate::Permission(action) => match context {
                Some(context) => self.actor.allowed_to(action, Some(context)),
                None => {
                    debug!(action = %action, "No context supplied, permission gate denied");
                    false
                }
            },
        }
    }

    pub fn project_type(&self) -> Params {
        self.filter(View::ProjectType, None)
    }

    pub fn project_type_move(&self) -> Params {
        self.filter(View::ProjectTypeMove, None)
    }

    pub fn color(&self) -> Params {
        self.filter(View::Color, None)
    }

    pub fn color_move(&self) -> Params {
        self.filter(View::ColorMove, None)
    }

    pub fn custom_field(&self) -> Params {
        self.filter(View::CustomField, None)
    }

    pub fn planning_element_type(&self) -> Params {
        self.filter(View::PlanningElementType, None)
    }

    pub fn planning_element_type_move(&self) -> Params {
        self.filter(View::PlanningElementTypeMove, None)
    }

    /// Work package creation. `watcher_user_ids` requires
    /// `add_work_package_watchers` on `project`.
    pub fn new_work_package(&self, project: Option<&dyn Context>) -> Params {
        self.filter(View::NewWorkPackage, project)
    }

    /// Work package update. `time_entry` requires `log_time` on `project`.
    pub fn update_work_package(&self, project: Option<&dyn Context>) -> Params {
        self.filter(View::UpdateWorkPackage, project)
    }

    /// Self-service user profile fields.
    pub fn user(&self) -> Params {
        self.filter(View::User, None)
    }

    /// Administrator-only. Empty for everyone else.
    pub fn user_create_as_admin(&self) -> Params {
        self.filter(View::UserCreateAsAdmin, None)
    }

    /// Administrator-only. Like creation, plus `group_ids`.
    pub fn user_update_as_admin(&self) -> Params {
        self.filter(View::UserUpdateAsAdmin, None)
    }

    pub fn status(&self) -> Params {
        self.filter(View::Status, None)
    }

    pub fn enumeration(&self) -> Params {
        self.filter(View::Enumeration, None)
    }

    pub fn wiki_page(&self) -> Params {
        self.filter(View::WikiPage, None)
    }

    pub fn wiki_content(&self) -> Params {
        self.filter(View::WikiContent, None)
    }

    pub fn member(&self) -> Params {
        self.filter(View::Member, None)
    }
}
