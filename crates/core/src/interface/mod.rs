// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod catalog;
mod evaluator;
mod lock;
mod log;
mod provider;
mod sink;
mod table;

pub use catalog::{DependencyResolver, TableCatalog};
pub use evaluator::{BatchStream, TransformEvaluator, ViewSource};
pub use lock::{LockManager, TableLock};
pub use log::{ViewLog, ViewLogEntry, ViewStatus, ViewType};
pub use provider::TableProvider;
pub use sink::Sink;
pub use table::{TableDef, TableId, TableKind, ViewQuery};
