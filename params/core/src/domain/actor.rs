// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Actor & Context
//!
//! The requesting identity and the optional object a request targets.
//!
//! An [`Actor`] exposes exactly two things to the filtering layer: whether it
//! is an administrator, and a live permission query
//! [`Actor::allowed_to`]. A [`Context`] is an opaque handle (usually a
//! project) that is only ever forwarded to that query.
//!
//! Permission answers are never cached here. Every gated field re-asks the
//! actor on every accessor call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a [`Context`] object (e.g. a project identifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(pub String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal capability required of a context object: a stable identity the
/// authorization oracle can key on.
pub trait Context: Send + Sync {
    fn id(&self) -> ContextId;
}

/// A project handle. The most common context for work package views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    pub id: ContextId,
}

impl Project {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: ContextId::new(id) }
    }
}

impl Context for Project {
    fn id(&self) -> ContextId {
        self.id.clone()
    }
}

/// Permission symbols the filter asks the oracle about.
///
/// Closed set: every gated field in the view table names one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// May assign watchers while creating a work package.
    AddWorkPackageWatchers,
    /// May book time while updating a work package.
    LogTime,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::AddWorkPackageWatchers, Action::LogTime];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AddWorkPackageWatchers => "add_work_package_watchers",
            Action::LogTime => "log_time",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown action: {0}")]
pub struct ActionParseError(pub String);

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ActionParseError(s.to_string()))
    }
}

/// The requesting identity.
///
/// Implementations must answer [`Actor::allowed_to`] live. The filter treats
/// the answer as authoritative for the duration of a single accessor call.
pub trait Actor: Send + Sync {
    /// Whether this actor is a system administrator.
    fn is_admin(&self) -> bool;

    /// Whether this actor may perform `action` on `context`.
    ///
    /// `context` is `None` when the caller did not supply one; implementations
    /// should deny in that case.
    fn allowed_to(&self, action: Action, context: Option<&dyn Context>) -> bool;
}

impl<A: Actor + ?Sized> Actor for &A {
    fn is_admin(&self) -> bool {
        (**self).is_admin()
    }

    fn allowed_to(&self, action: Action, context: Option<&dyn Context>) -> bool {
        (**self).allowed_to(action, context)
    }
}
