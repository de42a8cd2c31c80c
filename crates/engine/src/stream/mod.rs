// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Adapters applied to the batches a view query produces before they reach
//! the view's target.

mod convert;
mod defaults;
mod squash;

pub use convert::{Converting, convert_by_name};
pub use defaults::complete_with_defaults;
pub use squash::Squashing;
