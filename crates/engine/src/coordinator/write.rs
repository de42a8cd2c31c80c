// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::borrow::Cow;

use cascade_core::{ExecutionContext, Result};
use cascade_type::{Batch, validate_nested_sizes};
use tracing::{debug, instrument, trace};

use super::FanOutCoordinator;
use crate::{
	log::log_views,
	pool::fan_out,
	stream::complete_with_defaults,
	view::PushSource,
};

impl FanOutCoordinator {
	#[instrument(name = "engine::coordinator::write_prefix", level = "trace", skip_all, fields(table = %self.target.id))]
	pub fn write_prefix(&mut self) -> Result<()> {
		if let Some(output) = self.output.as_mut() {
			output.write_prefix()?;
		}

		for index in 0..self.views.len() {
			self.views[index].process_prefix();
			if self.views[index].is_failed() {
				return self.check_failures();
			}
		}
		Ok(())
	}

	/// Writes `batch` to the target and pushes it to every dependent.
	///
	/// Returns the first failure recorded by any dependent once all
	/// dependents that were started have finished.
	#[instrument(name = "engine::coordinator::write", level = "trace", skip_all, fields(table = %self.target.id, rows = batch.row_count()))]
	pub fn write(&mut self, batch: &Batch) -> Result<()> {
		validate_nested_sizes(batch)?;

		if self.target.is_live_view() {
			let services = self.scope.services();
			services.provider.write_pass_through(&self.target, batch, &self.scope)?;
			ExecutionContext::account_write(batch.row_count(), batch.size_bytes());
			return Ok(());
		}

		let batch = if self.partial {
			Cow::Owned(complete_with_defaults(batch, &self.target)?)
		} else {
			Cow::Borrowed(batch)
		};

		if let Some(output) = self.output.as_mut() {
			output.write(&batch)?;
			ExecutionContext::account_write(batch.row_count(), batch.size_bytes());
		}

		if self.views.is_empty() {
			return Ok(());
		}

		// Dependents saw this batch when it was first inserted.
		if !self.scope.settings().deduplicate_blocks_in_dependent_materialized_views
			&& self.output.as_ref().is_some_and(|output| output.last_batch_is_duplicate())
		{
			debug!(table = %self.target.id, "duplicate batch, skipping views");
			return Ok(());
		}

		let parallelism = self.parallelism();
		let source = PushSource {
			table: &self.target,
			select_scope: &self.select_scope,
			insert_scope: &self.insert_scope,
		};

		let failed = fan_out(&mut self.views, parallelism, |view| view.process_block(&batch, &source))?;
		if failed {
			return self.check_failures();
		}
		Ok(())
	}

	#[instrument(name = "engine::coordinator::write_suffix", level = "trace", skip_all, fields(table = %self.target.id))]
	pub fn write_suffix(&mut self) -> Result<()> {
		if let Some(output) = self.output.as_mut() {
			output.write_suffix()?;
		}

		if self.views.is_empty() {
			return Ok(());
		}

		let parallelism = self.parallelism();
		let source = self.target.name();
		let failed = fan_out(&mut self.views, parallelism, |view| {
			view.process_suffix();
			if !view.is_failed() {
				trace!(
					"Pushing from {source} to {} took {} ms.",
					view.stats().target_name(),
					view.stats().elapsed_ms()
				);
			}
		})?;
		if failed {
			return self.check_failures();
		}

		if self.views.len() > 1 {
			debug!(
				"Pushing from {} to {} views took {} ms.",
				source,
				self.views.len(),
				self.started.elapsed().as_millis()
			);
		}

		log_views(&self.scope, &self.views);
		Ok(())
	}

	/// Flushes the target and then every dependent in order. Dependents are
	/// flushed without their execution contexts installed.
	#[instrument(name = "engine::coordinator::flush", level = "trace", skip_all, fields(table = %self.target.id))]
	pub fn flush(&mut self) -> Result<()> {
		if let Some(output) = self.output.as_mut() {
			output.flush()?;
		}

		for view in self.views.iter_mut() {
			view.out_mut().flush()?;
		}
		Ok(())
	}

	/// Logs every view and returns the first recorded failure, if any.
	fn check_failures(&self) -> Result<()> {
		let Some(failure) = self.views.iter().find_map(|view| view.failure()) else {
			return Ok(());
		};

		log_views(&self.scope, &self.views);
		Err(failure.clone())
	}
}
