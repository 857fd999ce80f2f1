// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`actor`] | `Actor`, `Context`, `Action` |
//! | [`view`] | `View` catalogue and `ViewPolicy` table |
//! | [`registry`] | `AllowlistRegistry` static allowlists |
//! | [`custom_fields`] | custom field values shape filter |

pub mod actor;
pub mod custom_fields;
pub mod registry;
pub mod view;
