// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod coordinator;
mod insert;
pub mod log;
mod pool;
pub mod stream;
pub mod view;

pub use cascade_core::Result;
pub use coordinator::{FanOutCoordinator, InsertTarget};
pub use insert::execute_insert;
pub use log::TracingViewLog;
pub use view::{DependentView, RuntimeStats, ViewKind};
