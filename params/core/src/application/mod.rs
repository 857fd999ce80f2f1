// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application layer: the per-request [`param_filter::ParamFilter`].

pub mod param_filter;
