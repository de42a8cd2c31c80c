// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{iter, time::Instant};

use cascade_core::{
	ExecutionScope, Result,
	interface::{BatchStream, TableDef, ViewSource, ViewStatus},
};
use cascade_type::{Batch, error, error::diagnostic::view::dependent_failure, validate_nested_sizes};
use tracing::{instrument, trace};

use super::{DependentView, ViewKind};
use crate::stream::{Converting, Squashing};

/// Write phase a dependent view runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
	Prefix,
	Block,
	Suffix,
}

impl Phase {
	fn completed(self) -> ViewStatus {
		match self {
			Phase::Prefix => ViewStatus::WrittenPrefix,
			Phase::Block => ViewStatus::WrittenBlock,
			Phase::Suffix => ViewStatus::WrittenSuffix,
		}
	}

	fn action(self) -> &'static str {
		match self {
			Phase::Prefix => "writing prefix to",
			Phase::Block => "pushing to",
			Phase::Suffix => "writing suffix to",
		}
	}
}

/// The table a batch was inserted into and the scopes its views run under.
pub(crate) struct PushSource<'a> {
	pub table: &'a TableDef,
	/// Scope view queries are evaluated in.
	pub select_scope: &'a ExecutionScope,
	/// Scope the views' own inserts were built with.
	pub insert_scope: &'a ExecutionScope,
}

impl DependentView {
	pub(crate) fn process_prefix(&mut self) {
		self.run(Phase::Prefix, |view| view.out.write_prefix());
	}

	#[instrument(name = "engine::view::push", level = "trace", skip_all, fields(view = %self.table, rows = batch.row_count()))]
	pub(crate) fn process_block(&mut self, batch: &Batch, source: &PushSource<'_>) {
		self.run(Phase::Block, |view| view.push(batch, source));
	}

	pub(crate) fn process_suffix(&mut self) {
		self.run(Phase::Suffix, |view| view.out.write_suffix());
	}

	/// Runs one phase with the view's execution context installed.
	///
	/// Failures are recorded on the view rather than returned; the
	/// coordinator decides when to surface them.
	fn run(&mut self, phase: Phase, work: impl FnOnce(&mut Self) -> Result<()>) {
		let started = Instant::now();
		let context = self.stats.context().clone();
		let result = {
			let _guard = context.enter();
			work(self)
		};
		self.stats.add_elapsed(started.elapsed());

		match result {
			Ok(()) => self.stats.advance(phase.completed()),
			Err(err) => {
				trace!(view = %self.table, phase = phase.action(), error = %err, "view failed");
				if self.failure.is_none() {
					let view = self.table.to_string();
					self.failure = Some(error!(dependent_failure(&view, phase.action(), err.diagnostic())));
				}
			}
		}
	}

	fn push(&mut self, batch: &Batch, source: &PushSource<'_>) -> Result<()> {
		let produced: BatchStream = match &self.kind {
			ViewKind::Transforming(query) => {
				let services = source.select_scope.services();
				let input = ViewSource {
					table: source.table.id.clone(),
					schema: batch.schema(),
					batch: batch.clone(),
				};
				let stream = services.evaluator.evaluate(query, input, source.select_scope)?;

				let settings = source.insert_scope.settings();
				let squashed = Squashing::new(
					stream,
					settings.min_insert_block_size_rows,
					settings.min_insert_block_size_bytes,
				);
				Box::new(Converting::new(squashed, self.out.header().clone()))
			}
			ViewKind::PassThrough | ViewKind::Chained => Box::new(iter::once(Ok(batch.clone()))),
		};

		for batch in produced {
			let batch = batch?;
			validate_nested_sizes(&batch)?;
			self.out.write(&batch)?;
		}
		Ok(())
	}
}
