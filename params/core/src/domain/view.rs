// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Views
//!
//! A [`View`] is one named filtering policy: which section of the raw input to
//! read, which registry allowlist applies, which fields are gated on the
//! actor, and whether custom field values may pass through.
//!
//! The set of views is closed. Each variant maps to a [`ViewPolicy`] through
//! [`View::policy`].
//!
//! ## Move views
//!
//! `*_move` views share the section key of their full counterpart but only
//! ever permit `move_to`; reordering endpoints accept nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::actor::Action;

/// Condition an actor must satisfy for a field (or a whole view) to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "action")]
pub enum Gate {
    /// `Actor::is_admin`, no oracle call.
    Administrator,
    /// `Actor::allowed_to(action, context)`; denied when no context is given.
    Permission(Action),
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Administrator => f.write_str("administrator"),
            Gate::Permission(action) => write!(f, "allowed_to({action})"),
        }
    }
}

/// A field that is only permitted when its gate passes at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatedField {
    pub field: &'static str,
    pub gate: Gate,
}

/// Static description of how one view filters its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPolicy {
    /// Top-level key of the raw input holding this view's section.
    pub section: &'static str,
    /// Registry kind supplying the static allowlist.
    pub registry_kind: &'static str,
    /// Gate on the whole view. When it fails the output is empty.
    pub view_gate: Option<Gate>,
    pub gated_fields: &'static [GatedField],
    pub custom_field_values: bool,
}

const NO_GATED_FIELDS: &[GatedField] = &[];

const WATCHERS: &[GatedField] = &[GatedField {
    field: "watcher_user_ids",
    gate: Gate::Permission(Action::AddWorkPackageWatchers),
}];

const TIME_ENTRY: &[GatedField] = &[GatedField {
    field: "time_entry",
    gate: Gate::Permission(Action::LogTime),
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    ProjectType,
    ProjectTypeMove,
    Color,
    ColorMove,
    CustomField,
    PlanningElementType,
    PlanningElementTypeMove,
    NewWorkPackage,
    UpdateWorkPackage,
    User,
    UserCreateAsAdmin,
    UserUpdateAsAdmin,
    Status,
    Enumeration,
    WikiPage,
    WikiContent,
    Member,
}

impl View {
    pub const ALL: [View; 17] = [
        View::ProjectType,
        View::ProjectTypeMove,
        View::Color,
        View::ColorMove,
        View::CustomField,
        View::PlanningElementType,
        View::PlanningElementTypeMove,
        View::NewWorkPackage,
        View::UpdateWorkPackage,
        View::User,
        View::UserCreateAsAdmin,
        View::UserUpdateAsAdmin,
        View::Status,
        View::Enumeration,
        View::WikiPage,
        View::WikiContent,
        View::Member,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::ProjectType => "project_type",
            View::ProjectTypeMove => "project_type_move",
            View::Color => "color",
            View::ColorMove => "color_move",
            View::CustomField => "custom_field",
            View::PlanningElementType => "planning_element_type",
            View::PlanningElementTypeMove => "planning_element_type_move",
            View::NewWorkPackage => "new_work_package",
            View::UpdateWorkPackage => "update_work_package",
            View::User => "user",
            View::UserCreateAsAdmin => "user_create_as_admin",
            View::UserUpdateAsAdmin => "user_update_as_admin",
            View::Status => "status",
            View::Enumeration => "enumeration",
            View::WikiPage => "wiki_page",
            View::WikiContent => "wiki_content",
            View::Member => "member",
        }
    }

    pub fn policy(&self) -> ViewPolicy {
        let kind = self.as_str();
        let plain = |section: &'static str| ViewPolicy {
            section,
            registry_kind: kind,
            view_gate: None,
            gated_fields: NO_GATED_FIELDS,
            custom_field_values: false,
        };

        match self {
            View::ProjectType | View::ProjectTypeMove => plain("project_type"),
            View::Color | View::ColorMove => plain("color"),
            View::CustomField => plain("custom_field"),
            View::PlanningElementType | View::PlanningElementTypeMove => {
                plain("planning_element_type")
            }
            View::NewWorkPackage => ViewPolicy {
                gated_fields: WATCHERS,
                custom_field_values: true,
                ..plain("work_package")
            },
            View::UpdateWorkPackage => ViewPolicy {
                gated_fields: TIME_ENTRY,
                custom_field_values: true,
                ..plain("work_package")
            },
            View::User => ViewPolicy {
                custom_field_values: true,
                ..plain("user")
            },
            View::UserCreateAsAdmin | View::UserUpdateAsAdmin => ViewPolicy {
                view_gate: Some(Gate::Administrator),
                custom_field_values: true,
                ..plain("user")
            },
            View::Status => plain("status"),
            View::Enumeration => ViewPolicy {
                custom_field_values: true,
                ..plain("enumeration")
            },
            View::WikiPage => plain("page"),
            View::WikiContent => plain("content"),
            View::Member => plain("member"),
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(
            self,
            View::ProjectTypeMove | View::ColorMove | View::PlanningElementTypeMove
        )
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown view: {0}")]
pub struct ViewParseError(pub String);

impl FromStr for View {
    type Err = ViewParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| ViewParseError(s.to_string()))
    }
}
