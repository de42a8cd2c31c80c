// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Instant;

use cascade_core::{
	ExecutionContext, ExecutionScope, Result,
	interface::{Sink, TableDef, TableId, TableKind, TableLock},
};
use cascade_type::{
	Schema,
	error::diagnostic::{schema::unknown_column, view::view_depth_exceeded},
	return_error,
};
use tracing::{debug, instrument};

use super::{FanOutCoordinator, InsertTarget};
use crate::view::{DependentView, ViewKind};

impl FanOutCoordinator {
	/// Prepares an insert into `target` together with every dependent
	/// reachable from it.
	///
	/// Shared locks are taken on the target and on each materialized view
	/// before anything else happens, and are held until the coordinator is
	/// dropped. Dependents are built recursively with a copy of the settings
	/// in which block deduplication is switched off when the target already
	/// deduplicates.
	#[instrument(name = "engine::coordinator::new", level = "debug", skip_all, fields(table = %target.table.id, depth = scope.depth()))]
	pub fn new(scope: &ExecutionScope, target: InsertTarget) -> Result<Self> {
		let settings = scope.settings();
		let services = scope.services();
		let table = target.table;

		if scope.depth() > settings.max_view_depth {
			return_error!(view_depth_exceeded(&table.name(), scope.depth(), settings.max_view_depth));
		}

		let timeout = settings.lock_acquire_timeout();
		let mut locks = vec![services.locks.acquire_shared(&table.id, scope.query_id(), timeout)?];

		let dependencies = services.resolver.dependents(&table.id)?;

		let (select_scope, insert_scope) = if dependencies.is_empty() {
			(scope.clone(), scope.clone())
		} else {
			// Deduplication already happened in the target, so the same batch
			// must not be deduplicated again in its views.
			let disable_deduplication_for_children = !settings.deduplicate_blocks_in_dependent_materialized_views
				&& !target.no_destination
				&& table.deduplicates;

			let select_scope = scope.fork(|_| {});
			let insert_scope = scope
				.fork(|settings| {
					if disable_deduplication_for_children {
						settings.insert_deduplicate = false;
					}
					// zero leaves the insert threshold in place
					if let Some(rows) = settings.min_insert_block_size_rows_for_materialized_views.filter(|rows| *rows > 0) {
						settings.min_insert_block_size_rows = rows;
					}
					if let Some(bytes) =
						settings.min_insert_block_size_bytes_for_materialized_views.filter(|bytes| *bytes > 0)
					{
						settings.min_insert_block_size_bytes = bytes;
					}
				})
				.nested();
			(select_scope, insert_scope)
		};

		let mut views = Vec::with_capacity(dependencies.len());
		for dependency in &dependencies {
			let view = build_dependent(&table, dependency, &select_scope, &insert_scope, &mut locks)?;
			views.push(view);
		}

		let output = if target.no_destination {
			None
		} else {
			let sink = services.provider.acquire_sink(&table, scope)?;
			table.schema.check(&table.name(), sink.header())?;
			Some(sink)
		};

		let partial = match &target.columns {
			Some(columns) => {
				for column in columns {
					if !table.schema.contains(column) {
						return_error!(unknown_column(&table.name(), column));
					}
				}
				true
			}
			None => false,
		};

		let header = match (&target.columns, &output) {
			(_, None) => table.schema_with_virtuals(),
			(Some(columns), Some(_)) => table.schema.project(columns.iter().map(String::as_str)),
			(None, Some(_)) => table.schema.clone(),
		};

		debug!(views = views.len(), destination = output.is_some(), "coordinator ready");

		Ok(Self {
			target: table,
			scope: scope.clone(),
			select_scope,
			insert_scope,
			header,
			partial: partial && output.is_some(),
			views,
			output,
			started: Instant::now(),
			_locks: locks,
		})
	}
}

fn build_dependent(
	source: &TableDef,
	dependency: &TableId,
	select_scope: &ExecutionScope,
	insert_scope: &ExecutionScope,
	locks: &mut Vec<TableLock>,
) -> Result<DependentView> {
	let services = select_scope.services();
	let settings = select_scope.settings();
	let dependent = services.catalog.table(dependency)?;

	let (target_name, kind, query, out) = match &dependent.kind {
		TableKind::MaterializedView {
			query,
			target,
		} => {
			locks.push(services.locks.acquire_shared(
				&dependent.id,
				select_scope.query_id(),
				settings.lock_acquire_timeout(),
			)?);

			let inner = services.catalog.table(target)?;
			let produced = services.evaluator.output_schema(query, &source.schema_with_virtuals(), select_scope)?;

			// Query columns the target does not store are not written.
			let columns: Schema = produced.iter().filter(|column| inner.schema.contains(&column.name)).cloned().collect();
			let out: Box<dyn Sink> = Box::new(FanOutCoordinator::new(
				insert_scope,
				InsertTarget::new(inner.clone()).columns(columns.names().map(str::to_string)),
			)?);

			(inner.name(), ViewKind::Transforming(query.clone()), Some(query.clone()), out)
		}
		TableKind::LiveView {
			query,
		} => {
			let out: Box<dyn Sink> =
				Box::new(FanOutCoordinator::new(insert_scope, InsertTarget::new(dependent.clone()).no_destination())?);
			(dependent.name(), ViewKind::PassThrough, Some(query.clone()), out)
		}
		TableKind::Table => {
			let out: Box<dyn Sink> = Box::new(FanOutCoordinator::new(insert_scope, InsertTarget::new(dependent.clone()))?);
			(dependent.name(), ViewKind::Chained, None, out)
		}
	};

	let context = ExecutionContext::new(select_scope.query_id(), target_name);
	Ok(DependentView::new(dependent.id.clone(), kind, query, out, context))
}
