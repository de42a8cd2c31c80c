// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod process;
mod stats;

use std::sync::Arc;

use cascade_core::{
	Error, ExecutionContext,
	interface::{Sink, TableId, ViewQuery, ViewStatus, ViewType},
};
pub(crate) use process::PushSource;
pub use stats::RuntimeStats;

/// How a dependent derives what it receives from the inserted batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewKind {
	/// Runs the query over the batch and writes its output.
	Transforming(ViewQuery),
	/// Receives the batch unchanged.
	PassThrough,
	/// A plain table fed with the batch unchanged.
	Chained,
}

impl ViewKind {
	pub fn view_type(&self) -> ViewType {
		match self {
			ViewKind::Transforming(_) => ViewType::Materialized,
			ViewKind::PassThrough => ViewType::Live,
			ViewKind::Chained => ViewType::Default,
		}
	}
}

/// One dependent of the table an insert writes to.
///
/// Every dependent owns its output sink (a nested coordinator) and an
/// execution context of its own, so its work is accounted separately from
/// the insert that triggered it.
pub struct DependentView {
	table: TableId,
	kind: ViewKind,
	query: Option<ViewQuery>,
	out: Box<dyn Sink>,
	stats: RuntimeStats,
	failure: Option<Error>,
}

impl DependentView {
	pub(crate) fn new(
		table: TableId,
		kind: ViewKind,
		query: Option<ViewQuery>,
		out: Box<dyn Sink>,
		context: Arc<ExecutionContext>,
	) -> Self {
		let stats = RuntimeStats::new(context, kind.view_type());
		Self {
			table,
			kind,
			query,
			out,
			stats,
			failure: None,
		}
	}

	/// The dependent table or view.
	pub fn table(&self) -> &TableId {
		&self.table
	}

	pub fn kind(&self) -> &ViewKind {
		&self.kind
	}

	pub fn query(&self) -> Option<&ViewQuery> {
		self.query.as_ref()
	}

	pub fn stats(&self) -> &RuntimeStats {
		&self.stats
	}

	/// Last phase that completed without error.
	pub fn status(&self) -> ViewStatus {
		self.stats.status()
	}

	pub fn context(&self) -> &Arc<ExecutionContext> {
		self.stats.context()
	}

	/// First failure this view recorded, already tagged with the view.
	pub fn failure(&self) -> Option<&Error> {
		self.failure.as_ref()
	}

	pub fn is_failed(&self) -> bool {
		self.failure.is_some()
	}

	pub(crate) fn out_mut(&mut self) -> &mut dyn Sink {
		self.out.as_mut()
	}
}
