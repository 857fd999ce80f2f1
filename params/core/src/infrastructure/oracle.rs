// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Authorization Oracle Adapters
//!
//! The permission decision itself lives outside this crate. The filter only
//! needs an [`Actor`]; this module adapts an external
//! [`AuthorizationOracle`] into one.
//!
//! [`GrantTable`] is an in-memory oracle for local tooling and tests.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::domain::actor::{Action, Actor, Context, ContextId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External permission backend.
///
/// Must be side-effect free and idempotent. Answers are never cached by
/// callers in this crate.
pub trait AuthorizationOracle: Send + Sync {
    fn allowed(&self, actor: &ActorId, action: Action, context: Option<&ContextId>) -> bool;
}

/// An [`Actor`] whose permission questions are forwarded to an oracle.
#[derive(Clone)]
pub struct OracleActor {
    pub id: ActorId,
    pub admin: bool,
    oracle: Arc<dyn AuthorizationOracle>,
}

impl OracleActor {
    pub fn new(id: ActorId, admin: bool, oracle: Arc<dyn AuthorizationOracle>) -> Self {
        Self { id, admin, oracle }
    }
}

impl fmt::Debug for OracleActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleActor")
            .field("id", &self.id)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

impl Actor for OracleActor {
    fn is_admin(&self) -> bool {
        self.admin
    }

    fn allowed_to(&self, action: Action, context: Option<&dyn Context>) -> bool {
        let context_id = context.map(|c| c.id());
        let allowed = self.oracle.allowed(&self.id, action, context_id.as_ref());
        tracing::trace!(
            actor = %self.id,
            action = %action,
            context = ?context_id,
            allowed,
            "Authorization oracle consulted"
        );
        allowed
    }
}

/// A single permission grant. `context: None` grants the action on every
/// context, but still not when the caller supplies no context at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub actor: ActorId,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextId>,
}

/// In-memory [`AuthorizationOracle`] backed by a set of [`Grant`]s.
#[derive(Debug, Default)]
pub struct GrantTable {
    grants: RwLock<HashSet<Grant>>,
}

impl GrantTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, grant: Grant) {
        self.grants.write().insert(grant);
    }

    pub fn revoke(&self, grant: &Grant) -> bool {
        self.grants.write().remove(grant)
    }

    pub fn len(&self) -> usize {
        self.grants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.read().is_empty()
    }
}

impl FromIterator<Grant> for GrantTable {
    fn from_iter<I: IntoIterator<Item = Grant>>(iter: I) -> Self {
        Self {
            grants: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl AuthorizationOracle for GrantTable {
    fn allowed(&self, actor: &ActorId, action: Action, context: Option<&ContextId>) -> bool {
        let Some(context) = context else {
            return false;
        };

        self.grants.read().iter().any(|grant| {
            &grant.actor == actor
                && grant.action == action
                && grant.context.as_ref().is_none_or(|scoped| scoped == context)
        })
    }
}
