// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod context;
pub mod interface;
pub mod scope;
pub mod settings;

pub use cascade_type::{Error, Result};
pub use context::{ContextGuard, ExecutionContext};
pub use scope::{ExecutionScope, Services};
pub use settings::Settings;
