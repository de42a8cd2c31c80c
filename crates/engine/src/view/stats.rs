// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::Arc,
	time::{Duration, SystemTime},
};

use cascade_core::{
	Error, ExecutionContext,
	interface::{ViewLogEntry, ViewStatus, ViewType},
};

/// Runtime statistics of one dependent view over an insert.
#[derive(Debug)]
pub struct RuntimeStats {
	context: Arc<ExecutionContext>,
	view_type: ViewType,
	event_time: SystemTime,
	elapsed: Duration,
	status: ViewStatus,
}

impl RuntimeStats {
	pub(crate) fn new(context: Arc<ExecutionContext>, view_type: ViewType) -> Self {
		Self {
			context,
			view_type,
			event_time: SystemTime::now(),
			elapsed: Duration::ZERO,
			status: ViewStatus::Init,
		}
	}

	/// Name of the table the view writes to.
	pub fn target_name(&self) -> &str {
		self.context.name()
	}

	pub fn view_type(&self) -> ViewType {
		self.view_type
	}

	pub fn event_time(&self) -> SystemTime {
		self.event_time
	}

	/// Wall time spent in the view's write phases.
	pub fn elapsed(&self) -> Duration {
		self.elapsed
	}

	pub fn elapsed_ms(&self) -> u64 {
		u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
	}

	pub fn status(&self) -> ViewStatus {
		self.status
	}

	pub fn context(&self) -> &Arc<ExecutionContext> {
		&self.context
	}

	pub(crate) fn add_elapsed(&mut self, elapsed: Duration) {
		self.elapsed += elapsed;
	}

	pub(crate) fn advance(&mut self, status: ViewStatus) {
		if status > self.status {
			self.status = status;
		}
	}

	pub(crate) fn log_entry(&self, query_id: &str, view_query: Option<String>, failure: Option<&Error>) -> ViewLogEntry {
		ViewLogEntry {
			query_id: query_id.to_string(),
			view_name: self.target_name().to_string(),
			view_type: self.view_type,
			view_query,
			event_time: self.event_time,
			elapsed_ms: self.elapsed_ms(),
			status: self.status,
			exception_code: failure.map(|err| err.code.clone()),
			exception: failure.map(|err| err.to_string()),
			written_rows: self.context.rows_written(),
			written_bytes: self.context.bytes_written(),
		}
	}
}
