// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-memory collaborators for driving inserts through dependent views in
//! tests.

mod database;
mod evaluator;
mod sink;
pub mod util;
mod view_log;

pub use database::{ExclusiveLock, FailPoint, MemoryDatabase, SinkEvent, SinkEventKind, TableStats};
pub use evaluator::QueryEvaluator;
pub use sink::MemorySink;
pub use view_log::MemoryViewLog;
