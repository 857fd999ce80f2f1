// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Allowlist Registry
//!
//! Process-scoped table mapping an allowlist kind (e.g. `"project_type"`,
//! `"update_work_package"`) to the ordered set of field names it permits.
//!
//! ## Lookup vs. mutation
//!
//! - [`AllowlistRegistry::fields_for`] is total: an undeclared kind yields an
//!   empty [`FieldSet`], i.e. everything is forbidden.
//! - [`AllowlistRegistry::register`] fails fast with
//!   [`RegistryError::UnknownKind`] when the kind is not declared, so a typo
//!   cannot create an orphan allowlist.
//!
//! ## Concurrency
//!
//! The table is copy-on-write. Readers clone an `Arc` to the current table
//! and release the lock immediately; `register` swaps in a modified copy.
//! Registration is expected at startup or in test setup only.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration errors raised by registry mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown allowlist kind: {0}")]
    UnknownKind(String),

    #[error("Invalid field name for kind '{kind}': {field:?}")]
    InvalidField { kind: String, field: String },
}

/// Built-in allowlists. Move kinds carry only `move_to`.
const BUILTIN_ALLOWLISTS: &[(&str, &[&str])] = &[
    (
        "project_type",
        &["name", "allows_association", "reported_project_status_ids"],
    ),
    ("project_type_move", &["move_to"]),
    ("color", &["name", "hexcode"]),
    ("color_move", &["move_to"]),
    ("custom_field", &["editable", "visible"]),
    (
        "planning_element_type",
        &["name", "in_aggregation", "is_milestone", "is_default", "color_id"],
    ),
    ("planning_element_type_move", &["move_to"]),
    (
        "new_work_package",
        &[
            "subject",
            "description",
            "start_date",
            "due_date",
            "assigned_to_id",
            "responsible_id",
            "type_id",
            "priority_id",
            "parent_id",
            "fixed_version_id",
            "estimated_hours",
            "done_ratio",
            "status_id",
            "category_id",
        ],
    ),
    (
        "update_work_package",
        &[
            "subject",
            "description",
            "start_date",
            "due_date",
            "assigned_to_id",
            "responsible_id",
            "type_id",
            "priority_id",
            "parent_id",
            "fixed_version_id",
            "estimated_hours",
            "done_ratio",
            "lock_version",
            "status_id",
            "category_id",
            "notes",
            "attachments",
        ],
    ),
    (
        "user",
        &[
            "firstname",
            "lastname",
            "mail",
            "mail_notification",
            "language",
            "custom_fields",
            "identity_url",
        ],
    ),
    (
        "user_create_as_admin",
        &[
            "firstname",
            "lastname",
            "mail",
            "mail_notification",
            "language",
            "custom_fields",
            "identity_url",
            "auth_source_id",
            "force_password_change",
        ],
    ),
    (
        "user_update_as_admin",
        &[
            "firstname",
            "lastname",
            "mail",
            "mail_notification",
            "language",
            "custom_fields",
            "identity_url",
            "auth_source_id",
            "force_password_change",
            "group_ids",
        ],
    ),
    (
        "status",
        &["name", "default_done_ratio", "is_closed", "is_default", "move_to"],
    ),
    (
        "enumeration",
        &["name", "active", "is_default", "reassign_to_id", "move_to"],
    ),
    ("wiki_page", &["title", "parent_id", "redirect_existing_links"]),
    ("wiki_content", &["comments", "text", "lock_version"]),
    ("member", &["role_ids"]),
];

/// Ordered, duplicate-free list of permitted field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(Vec<String>);

impl FieldSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds `field`, returning `false` if it was already present.
    pub fn insert(&mut self, field: impl Into<String>) -> bool {
        let field = field.into();
        if self.contains(&field) {
            return false;
        }
        self.0.push(field);
        true
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|f| f == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

type Table = BTreeMap<String, FieldSet>;

/// Immutable view of the registry at one point in time.
///
/// Also the unit of save/restore for tests.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot(Arc<Table>);

impl RegistrySnapshot {
    /// Fields permitted for `kind`; empty for undeclared kinds.
    pub fn fields_for(&self, kind: &str) -> FieldSet {
        self.0.get(kind).cloned().unwrap_or_default()
    }

    /// Borrowing variant of [`Self::fields_for`] used on the hot path.
    pub fn permits(&self, kind: &str, field: &str) -> bool {
        self.0.get(kind).is_some_and(|fields| fields.contains(field))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Read-mostly allowlist table shared by every [`crate::ParamFilter`].
#[derive(Debug)]
pub struct AllowlistRegistry {
    table: RwLock<Arc<Table>>,
}

impl AllowlistRegistry {
    /// A registry with no declared kinds. Every lookup is empty and every
    /// registration fails.
    pub fn empty() -> Self {
        Self {
            table: RwLock::new(Arc::new(Table::new())),
        }
    }

    /// A registry pre-populated with the built-in allowlists.
    pub fn with_builtin() -> Self {
        let table: Table = BUILTIN_ALLOWLISTS
            .iter()
            .map(|(kind, fields)| (kind.to_string(), fields.iter().copied().collect()))
            .collect();

        Self {
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// Idempotently permit `field` for `kind`.
    ///
    /// Returns `Ok(true)` if the field was newly added, `Ok(false)` if it was
    /// already permitted.
    ///
    /// # Errors
    ///
    /// - `UnknownKind` — `kind` is not declared in the table
    /// - `InvalidField` — `field` is empty
    pub fn register(&self, kind: &str, field: &str) -> Result<bool, RegistryError> {
        self.register_all(kind, [field]).map(|added| added > 0)
    }

    /// Permit several fields for `kind` in one swap. Either all fields are
    /// validated and applied, or none are.
    ///
    /// Returns the number of fields that were newly added.
    pub fn register_all<'a>(
        &self,
        kind: &str,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Result<usize, RegistryError> {
        let fields: Vec<&str> = fields.into_iter().collect();
        if let Some(bad) = fields.iter().find(|f| f.trim().is_empty()) {
            return Err(RegistryError::InvalidField {
                kind: kind.to_string(),
                field: bad.to_string(),
            });
        }

        let mut guard = self.table.write();
        if !guard.contains_key(kind) {
            return Err(RegistryError::UnknownKind(kind.to_string()));
        }

        let missing: Vec<&str> = fields
            .into_iter()
            .filter(|f| !guard.get(kind).is_some_and(|set| set.contains(f)))
            .collect();
        if missing.is_empty() {
            debug!(kind = %kind, "Fields already permitted, registry unchanged");
            return Ok(0);
        }

        let table = Arc::make_mut(&mut guard);
        let set = table.entry(kind.to_string()).or_default();
        let mut added = 0;
        for field in missing {
            if set.insert(field) {
                info!(kind = %kind, field = %field, "Permitted parameter registered");
                added += 1;
            }
        }
        Ok(added)
    }

    /// Current fields for `kind`. Undeclared kinds yield an empty set.
    pub fn fields_for(&self, kind: &str) -> FieldSet {
        self.snapshot().fields_for(kind)
    }

    pub fn kinds(&self) -> Vec<String> {
        self.snapshot().kinds().map(str::to_string).collect()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot(Arc::clone(&self.table.read()))
    }

    pub fn restore(&self, snapshot: RegistrySnapshot) {
        *self.table.write() = snapshot.0;
    }

    /// Run `f` against this registry and put the table back afterwards,
    /// whatever `f` registered and even if it panics.
    pub fn scoped<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let _restore = scopeguard::guard(self.snapshot(), |saved| self.restore(saved));
        f(self)
    }
}

impl Default for AllowlistRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_no_duplicate_kinds() {
        let registry = AllowlistRegistry::with_builtin();
        assert_eq!(registry.kinds().len(), BUILTIN_ALLOWLISTS.len());
    }

    #[test]
    fn test_fields_for_unknown_kind_is_empty() {
        let registry = AllowlistRegistry::with_builtin();
        assert!(registry.fields_for("bogus").is_empty());
    }

    #[test]
    fn test_fields_preserve_declaration_order() {
        let registry = AllowlistRegistry::with_builtin();
        let fields = registry.fields_for("color");
        assert_eq!(fields.iter().collect::<Vec<_>>(), vec!["name", "hexcode"]);
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = AllowlistRegistry::with_builtin();
        assert_eq!(registry.register("color", "shade"), Ok(true));
        assert_eq!(registry.register("color", "shade"), Ok(false));
        assert_eq!(registry.fields_for("color").len(), 3);
    }

    #[test]
    fn test_register_unknown_kind_fails() {
        let registry = AllowlistRegistry::with_builtin();
        assert_eq!(
            registry.register("totally_bogus_kind", "x"),
            Err(RegistryError::UnknownKind("totally_bogus_kind".to_string()))
        );
        assert!(registry.fields_for("totally_bogus_kind").is_empty());
    }

    #[test]
    fn test_register_rejects_blank_field() {
        let registry = AllowlistRegistry::with_builtin();
        assert!(matches!(
            registry.register("color", "  "),
            Err(RegistryError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_register_all_is_atomic() {
        let registry = AllowlistRegistry::with_builtin();
        let result = registry.register_all("color", ["shade", ""]);
        assert!(result.is_err());
        assert!(!registry.fields_for("color").contains("shade"));

        assert_eq!(registry.register_all("color", ["shade", "tint", "name"]), Ok(2));
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = AllowlistRegistry::empty();
        assert!(registry.kinds().is_empty());
        assert!(registry.register("project_type", "name").is_err());
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_registration() {
        let registry = AllowlistRegistry::with_builtin();
        let before = registry.snapshot();
        registry.register("member", "user_id").unwrap();

        assert!(!before.permits("member", "user_id"));
        assert!(registry.snapshot().permits("member", "user_id"));
    }

    #[test]
    fn test_restore_rolls_back() {
        let registry = AllowlistRegistry::with_builtin();
        let saved = registry.snapshot();
        registry.register("member", "user_id").unwrap();
        registry.restore(saved);
        assert!(!registry.fields_for("member").contains("user_id"));
    }

    #[test]
    fn test_scoped_restores_after_panic() {
        let registry = AllowlistRegistry::with_builtin();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.scoped(|reg| {
                reg.register("member", "user_id").unwrap();
                panic!("fixture failure");
            })
        }));
        assert!(result.is_err());
        assert!(!registry.fields_for("member").contains("user_id"));
    }

    #[test]
    fn test_scoped_returns_closure_value() {
        let registry = AllowlistRegistry::with_builtin();
        let seen = registry.scoped(|reg| {
            reg.register("member", "user_id").unwrap();
            reg.fields_for("member").contains("user_id")
        });
        assert!(seen);
        assert!(!registry.fields_for("member").contains("user_id"));
    }
}
