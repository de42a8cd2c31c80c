// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Fan-out of inserted batches to dependent views.
//!
//! A [`FanOutCoordinator`] stands in for the sink of the table an insert
//! writes to. It writes every batch to the table itself and then pushes it
//! to each dependent: materialized views run their query over the batch,
//! live views and dependent tables receive it as is. Each dependent is fed
//! through a coordinator of its own, so chains of views are followed to
//! any depth below `max_view_depth`.

mod build;
mod write;

use std::{sync::Arc, time::Instant};

use cascade_core::{
	ExecutionScope, Result,
	interface::{Sink, TableDef, TableLock},
};
use cascade_type::{Batch, Schema};

use crate::view::DependentView;

/// The table an insert writes to.
#[derive(Debug, Clone)]
pub struct InsertTarget {
	table: Arc<TableDef>,
	columns: Option<Vec<String>>,
	no_destination: bool,
}

impl InsertTarget {
	pub fn new(table: impl Into<Arc<TableDef>>) -> Self {
		Self {
			table: table.into(),
			columns: None,
			no_destination: false,
		}
	}

	/// Restricts written batches to these columns; the rest are filled with
	/// defaults before the table receives them.
	pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
		self.columns = Some(columns.into_iter().map(Into::into).collect());
		self
	}

	/// Only push to dependents, never write to the table itself.
	pub fn no_destination(mut self) -> Self {
		self.no_destination = true;
		self
	}

	pub fn table(&self) -> &Arc<TableDef> {
		&self.table
	}
}

pub struct FanOutCoordinator {
	target: Arc<TableDef>,
	scope: ExecutionScope,
	select_scope: ExecutionScope,
	insert_scope: ExecutionScope,
	header: Schema,
	/// Set when the insert names a subset of the table's columns
	partial: bool,
	views: Vec<DependentView>,
	output: Option<Box<dyn Sink>>,
	started: Instant,
	// Dropped last so dependents are torn down while their tables are still locked
	_locks: Vec<TableLock>,
}

impl FanOutCoordinator {
	pub fn target(&self) -> &Arc<TableDef> {
		&self.target
	}

	pub fn scope(&self) -> &ExecutionScope {
		&self.scope
	}

	/// Dependents in resolution order.
	pub fn views(&self) -> &[DependentView] {
		&self.views
	}

	pub fn has_destination(&self) -> bool {
		self.output.is_some()
	}

	fn parallelism(&self) -> usize {
		let settings = self.scope.settings();
		if settings.parallel_view_processing {
			settings.max_threads.max(1).min(self.views.len())
		} else {
			1
		}
	}
}

impl Sink for FanOutCoordinator {
	fn header(&self) -> &Schema {
		&self.header
	}

	fn write_prefix(&mut self) -> Result<()> {
		FanOutCoordinator::write_prefix(self)
	}

	fn write(&mut self, batch: &Batch) -> Result<()> {
		FanOutCoordinator::write(self, batch)
	}

	fn write_suffix(&mut self) -> Result<()> {
		FanOutCoordinator::write_suffix(self)
	}

	fn flush(&mut self) -> Result<()> {
		FanOutCoordinator::flush(self)
	}

	fn last_batch_is_duplicate(&self) -> bool {
		self.output.as_ref().is_some_and(|output| output.last_batch_is_duplicate())
	}
}
