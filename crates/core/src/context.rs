// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per-thread execution contexts.
//!
//! Work done on a thread is attributed to the context installed in the
//! thread's ambient slot. Dependent views each get a context of their own;
//! a [`ContextGuard`] installs it for the duration of one write phase and
//! puts the previous context back when dropped, on every exit path.

use std::{
	cell::RefCell,
	marker::PhantomData,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::{Duration, Instant},
};

thread_local! {
	static CURRENT: RefCell<Option<Arc<ExecutionContext>>> = const { RefCell::new(None) };
}

#[derive(Debug)]
pub struct ExecutionContext {
	query_id: String,
	name: String,
	rows_written: AtomicU64,
	bytes_written: AtomicU64,
	batches_written: AtomicU64,
	busy_nanos: AtomicU64,
	activations: AtomicU64,
}

impl ExecutionContext {
	pub fn new(query_id: impl Into<String>, name: impl Into<String>) -> Arc<Self> {
		Arc::new(Self {
			query_id: query_id.into(),
			name: name.into(),
			rows_written: AtomicU64::new(0),
			bytes_written: AtomicU64::new(0),
			batches_written: AtomicU64::new(0),
			busy_nanos: AtomicU64::new(0),
			activations: AtomicU64::new(0),
		})
	}

	/// The context installed on the calling thread, if any.
	pub fn current() -> Option<Arc<ExecutionContext>> {
		CURRENT.with(|slot| slot.borrow().clone())
	}

	/// Address of the installed context, for identity comparisons.
	pub fn current_ptr() -> Option<*const ExecutionContext> {
		CURRENT.with(|slot| slot.borrow().as_ref().map(Arc::as_ptr))
	}

	/// Attributes a written batch to the context installed on this thread.
	pub fn account_write(rows: usize, bytes: usize) {
		CURRENT.with(|slot| {
			if let Some(context) = slot.borrow().as_ref() {
				context.rows_written.fetch_add(rows as u64, Ordering::Relaxed);
				context.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
				context.batches_written.fetch_add(1, Ordering::Relaxed);
			}
		})
	}

	/// Installs this context on the calling thread until the guard drops.
	pub fn enter(self: &Arc<Self>) -> ContextGuard {
		let previous = CURRENT.with(|slot| slot.borrow_mut().replace(self.clone()));
		self.activations.fetch_add(1, Ordering::Relaxed);
		ContextGuard {
			context: self.clone(),
			previous,
			started: Instant::now(),
			_not_send: PhantomData,
		}
	}

	pub fn query_id(&self) -> &str {
		&self.query_id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn rows_written(&self) -> u64 {
		self.rows_written.load(Ordering::Relaxed)
	}

	pub fn bytes_written(&self) -> u64 {
		self.bytes_written.load(Ordering::Relaxed)
	}

	pub fn batches_written(&self) -> u64 {
		self.batches_written.load(Ordering::Relaxed)
	}

	pub fn busy_time(&self) -> Duration {
		Duration::from_nanos(self.busy_nanos.load(Ordering::Relaxed))
	}

	/// How many times the context has been entered.
	pub fn activations(&self) -> u64 {
		self.activations.load(Ordering::Relaxed)
	}

	fn update_performance_counters(&self, started: Instant) {
		let nanos = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
		self.busy_nanos.fetch_add(nanos, Ordering::Relaxed);
	}
}

/// Restores the previously installed context when dropped.
///
/// Bound to the thread that created it.
pub struct ContextGuard {
	context: Arc<ExecutionContext>,
	previous: Option<Arc<ExecutionContext>>,
	started: Instant,
	_not_send: PhantomData<*const ()>,
}

impl ContextGuard {
	pub fn context(&self) -> &Arc<ExecutionContext> {
		&self.context
	}
}

impl Drop for ContextGuard {
	fn drop(&mut self) {
		self.context.update_performance_counters(self.started);
		let previous = self.previous.take();
		CURRENT.with(|slot| *slot.borrow_mut() = previous);
	}
}
