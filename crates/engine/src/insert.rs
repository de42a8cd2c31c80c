// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use cascade_core::{ExecutionContext, ExecutionScope, Result, interface::TableId};
use cascade_type::Batch;
use tracing::{debug, instrument};

use crate::coordinator::{FanOutCoordinator, InsertTarget};

/// Inserts `batches` into `table` and every view depending on it.
///
/// The insert runs under an execution context of its own, which is
/// returned so callers can inspect what was written to the table.
#[instrument(name = "engine::insert", level = "debug", skip(scope, batches), fields(query_id = %scope.query_id()))]
pub fn execute_insert(
	scope: &ExecutionScope,
	table: &TableId,
	batches: impl IntoIterator<Item = Batch>,
) -> Result<Arc<ExecutionContext>> {
	let context = ExecutionContext::new(scope.query_id(), table.to_string());
	let _guard = context.enter();

	let def = scope.services().catalog.table(table)?;
	let mut coordinator = FanOutCoordinator::new(scope, InsertTarget::new(def))?;

	coordinator.write_prefix()?;
	for batch in batches {
		coordinator.write(&batch)?;
	}
	coordinator.write_suffix()?;
	coordinator.flush()?;

	debug!(rows = context.rows_written(), views = coordinator.views().len(), "insert finished");
	Ok(context.clone())
}
