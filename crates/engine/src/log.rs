// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cascade_core::{
	ExecutionScope, Result,
	interface::{ViewLog, ViewLogEntry},
};
use tracing::{info, warn};

use crate::view::DependentView;

/// [`ViewLog`] that emits every entry as a structured tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingViewLog;

impl ViewLog for TracingViewLog {
	fn log_view(&self, entry: ViewLogEntry) -> Result<()> {
		info!(
			target: "cascade::query_views",
			query_id = %entry.query_id,
			view = %entry.view_name,
			view_type = %entry.view_type,
			status = %entry.status,
			elapsed_ms = entry.elapsed_ms,
			written_rows = entry.written_rows,
			written_bytes = entry.written_bytes,
			exception_code = entry.exception_code.as_deref(),
			"view finished"
		);
		Ok(())
	}
}

/// Hands the statistics of every view to the scope's view log.
///
/// Nothing is logged unless both `log_queries` and `log_query_views` are
/// set, and views that finished within `log_queries_min_query_duration_ms`
/// are left out. A log that rejects an entry only produces a warning.
pub(crate) fn log_views(scope: &ExecutionScope, views: &[DependentView]) {
	let settings = scope.settings();
	if views.is_empty() || !settings.log_queries || !settings.log_query_views {
		return;
	}

	let min_duration_ms = settings.log_queries_min_query_duration_ms;
	let view_log = &scope.services().view_log;

	for view in views {
		let stats = view.stats();
		if min_duration_ms > 0 && stats.elapsed_ms() <= min_duration_ms {
			continue;
		}

		let entry = stats.log_entry(scope.query_id(), view.query().map(|query| query.to_string()), view.failure());
		if let Err(err) = view_log.log_view(entry) {
			warn!(view = %view.table(), error = %err, "failed to log view statistics");
		}
	}
}
