// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::{HashMap, HashSet},
	fmt::{Display, Formatter},
	sync::{Arc, Barrier},
	thread,
	time::Duration,
};

use cascade_core::{
	ExecutionContext, ExecutionScope, Result, Services, Settings,
	interface::{
		DependencyResolver, LockManager, Sink, TableCatalog, TableDef, TableId, TableLock, TableProvider, ViewQuery,
	},
};
use cascade_type::{
	Batch, Schema, Value,
	error::diagnostic::{internal::internal, lock::lock_timeout, table::table_not_found},
	return_error,
};
use indexmap::IndexMap;
use parking_lot::{ArcRwLockWriteGuard, Mutex, RawRwLock, RwLock};
use tracing::trace;

use crate::{MemorySink, MemoryViewLog, QueryEvaluator};

/// Write lock on a table, held by a test to make inserts time out.
pub type ExclusiveLock = ArcRwLockWriteGuard<RawRwLock, ()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
	Prefix,
	Write,
	Suffix,
	Flush,
}

impl Display for FailPoint {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			FailPoint::Prefix => f.write_str("prefix"),
			FailPoint::Write => f.write_str("write"),
			FailPoint::Suffix => f.write_str("suffix"),
			FailPoint::Flush => f.write_str("flush"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEventKind {
	Prefix,
	Write,
	Duplicate,
	Suffix,
	Flush,
	PassThrough,
}

/// One call that reached a table, with the execution context that was
/// installed on the calling thread at that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkEvent {
	pub table: TableId,
	pub kind: SinkEventKind,
	pub context: Option<String>,
	pub rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStats {
	pub prefixes: usize,
	pub writes: usize,
	pub duplicates: usize,
	pub suffixes: usize,
	pub flushes: usize,
}

#[derive(Debug, Default)]
struct TableData {
	batches: Vec<Batch>,
	received: Vec<Batch>,
	fingerprints: HashSet<u64>,
	stats: TableStats,
}

#[derive(Debug, Clone, Default)]
struct WriteHooks {
	fail: HashSet<FailPoint>,
	gate: Option<Arc<Barrier>>,
	delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct Inner {
	tables: RwLock<IndexMap<TableId, Arc<TableDef>>>,
	dependents: RwLock<IndexMap<TableId, Vec<TableId>>>,
	data: Mutex<HashMap<TableId, TableData>>,
	events: Mutex<Vec<SinkEvent>>,
	locks: Mutex<HashMap<TableId, Arc<RwLock<()>>>>,
	hooks: Mutex<HashMap<TableId, WriteHooks>>,
	evaluator: Arc<QueryEvaluator>,
	view_log: Arc<MemoryViewLog>,
}

/// Catalog, storage and lock manager of an in-memory database.
///
/// Cloning shares the database.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
	inner: Arc<Inner>,
}

impl MemoryDatabase {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn create_table(&self, def: TableDef) -> Arc<TableDef> {
		let def = Arc::new(def);
		self.inner.tables.write().insert(def.id.clone(), def.clone());
		def
	}

	/// Registers a materialized view filling `target` from `source` through `query`.
	pub fn create_materialized_view(&self, id: TableId, query: &str, source: &TableId, target: &TableId) {
		self.create_table(TableDef::materialized_view(id.clone(), ViewQuery::new(query), target.clone()));
		self.add_dependent(source, id);
	}

	pub fn create_live_view(&self, id: TableId, schema: Schema, query: &str, source: &TableId) {
		self.create_table(TableDef::live_view(id.clone(), schema, ViewQuery::new(query)));
		self.add_dependent(source, id);
	}

	/// Makes `dependent` receive everything inserted into `source`.
	pub fn add_dependent(&self, source: &TableId, dependent: TableId) {
		self.inner.dependents.write().entry(source.clone()).or_default().push(dependent);
	}

	/// Batches stored in `table`, in write order.
	pub fn batches(&self, table: &TableId) -> Vec<Batch> {
		self.inner.data.lock().get(table).map(|data| data.batches.clone()).unwrap_or_default()
	}

	pub fn rows(&self, table: &TableId) -> Vec<Vec<Value>> {
		self.batches(table).iter().flat_map(Batch::rows).collect()
	}

	/// Batches a live view was handed.
	pub fn received(&self, view: &TableId) -> Vec<Batch> {
		self.inner.data.lock().get(view).map(|data| data.received.clone()).unwrap_or_default()
	}

	pub fn stats(&self, table: &TableId) -> TableStats {
		self.inner.data.lock().get(table).map(|data| data.stats.clone()).unwrap_or_default()
	}

	pub fn events(&self) -> Vec<SinkEvent> {
		self.inner.events.lock().clone()
	}

	pub fn events_of(&self, kind: SinkEventKind) -> Vec<SinkEvent> {
		self.events().into_iter().filter(|event| event.kind == kind).collect()
	}

	/// Makes every later call of `point` on `table` fail.
	pub fn fail_on(&self, table: &TableId, point: FailPoint) {
		self.inner.hooks.lock().entry(table.clone()).or_default().fail.insert(point);
	}

	/// Writes to `table` wait on `barrier` before storing anything.
	pub fn gate_writes(&self, table: &TableId, barrier: Arc<Barrier>) {
		self.inner.hooks.lock().entry(table.clone()).or_default().gate = Some(barrier);
	}

	pub fn delay_writes(&self, table: &TableId, delay: Duration) {
		self.inner.hooks.lock().entry(table.clone()).or_default().delay = Some(delay);
	}

	pub fn hold_exclusive(&self, table: &TableId) -> ExclusiveLock {
		self.lock_of(table).write_arc()
	}

	pub fn evaluator(&self) -> &QueryEvaluator {
		&self.inner.evaluator
	}

	pub fn view_log(&self) -> &MemoryViewLog {
		&self.inner.view_log
	}

	pub fn services(&self) -> Services {
		let shared = Arc::new(self.clone());
		Services {
			resolver: shared.clone(),
			catalog: shared.clone(),
			provider: shared.clone(),
			evaluator: self.inner.evaluator.clone(),
			locks: shared,
			view_log: self.inner.view_log.clone(),
		}
	}

	pub fn scope(&self, settings: Settings) -> ExecutionScope {
		ExecutionScope::new(self.services(), settings, "test-query")
	}

	fn lock_of(&self, table: &TableId) -> Arc<RwLock<()>> {
		self.inner.locks.lock().entry(table.clone()).or_default().clone()
	}

	/// Runs the hooks registered for `point` on `table`. Writes first wait
	/// on the write gate, so a write set up to fail still reaches it.
	pub(crate) fn run_hooks(&self, table: &TableId, point: FailPoint) -> Result<()> {
		// Cloned so no lock is held while waiting
		let hooks = self.inner.hooks.lock().get(table).cloned().unwrap_or_default();

		if point == FailPoint::Write {
			if let Some(gate) = &hooks.gate {
				gate.wait();
			}
		}

		if hooks.fail.contains(&point) {
			return_error!(internal(format!("injected {point} failure in {table}")));
		}

		if point == FailPoint::Write {
			if let Some(delay) = hooks.delay {
				thread::sleep(delay);
			}
		}
		Ok(())
	}

	pub(crate) fn record(&self, table: &TableId, kind: SinkEventKind, rows: usize) {
		let context = ExecutionContext::current().map(|context| context.name().to_string());
		trace!(table = %table, ?kind, ?context, rows, "sink event");
		self.inner.events.lock().push(SinkEvent {
			table: table.clone(),
			kind,
			context,
			rows,
		});

		let mut data = self.inner.data.lock();
		let stats = &mut data.entry(table.clone()).or_default().stats;
		match kind {
			SinkEventKind::Prefix => stats.prefixes += 1,
			SinkEventKind::Write | SinkEventKind::PassThrough => stats.writes += 1,
			SinkEventKind::Duplicate => stats.duplicates += 1,
			SinkEventKind::Suffix => stats.suffixes += 1,
			SinkEventKind::Flush => stats.flushes += 1,
		}
	}

	/// Stores `batch` unless `fingerprint` was stored before. Returns whether
	/// it was stored.
	pub(crate) fn store(&self, table: &TableId, batch: &Batch, fingerprint: Option<u64>) -> bool {
		let mut data = self.inner.data.lock();
		let data = data.entry(table.clone()).or_default();
		if let Some(fingerprint) = fingerprint {
			if !data.fingerprints.insert(fingerprint) {
				return false;
			}
		}
		data.batches.push(batch.clone());
		true
	}
}

impl DependencyResolver for MemoryDatabase {
	fn dependents(&self, table: &TableId) -> Result<Vec<TableId>> {
		Ok(self.inner.dependents.read().get(table).cloned().unwrap_or_default())
	}
}

impl TableCatalog for MemoryDatabase {
	fn table(&self, table: &TableId) -> Result<Arc<TableDef>> {
		match self.inner.tables.read().get(table) {
			Some(def) => Ok(def.clone()),
			None => return_error!(table_not_found(&table.to_string())),
		}
	}
}

impl TableProvider for MemoryDatabase {
	fn acquire_sink(&self, table: &TableDef, scope: &ExecutionScope) -> Result<Box<dyn Sink>> {
		let deduplicate = scope.settings().insert_deduplicate && table.deduplicates;
		Ok(Box::new(MemorySink::new(self.clone(), table, deduplicate)))
	}

	fn write_pass_through(&self, table: &TableDef, batch: &Batch, _scope: &ExecutionScope) -> Result<()> {
		self.run_hooks(&table.id, FailPoint::Write)?;
		self.inner.data.lock().entry(table.id.clone()).or_default().received.push(batch.clone());
		self.record(&table.id, SinkEventKind::PassThrough, batch.row_count());
		Ok(())
	}
}

impl LockManager for MemoryDatabase {
	fn acquire_shared(&self, table: &TableId, query_id: &str, timeout: Duration) -> Result<TableLock> {
		match self.lock_of(table).try_read_arc_for(timeout) {
			Some(guard) => Ok(TableLock::new(table.clone(), guard)),
			None => return_error!(lock_timeout(&table.to_string(), query_id, timeout)),
		}
	}
}
