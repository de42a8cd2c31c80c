// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::atomic::{AtomicUsize, Ordering};

use cascade_core::Result;
use cascade_type::{error, error::diagnostic::view::worker_pool_failure};
use rayon::ThreadPoolBuilder;
use tracing::{Span, trace, trace_span};

use crate::view::DependentView;

/// Runs `process` once per view and reports whether any view ended up failed.
///
/// With `parallelism` above one the views are processed on a pool built for
/// this call, and the call returns once every task has finished. A task
/// that starts after another view failed skips its view. Sequential
/// processing stops at the first failed view.
pub(crate) fn fan_out<F>(views: &mut [DependentView], parallelism: usize, process: F) -> Result<bool>
where
	F: Fn(&mut DependentView) + Sync,
{
	if parallelism <= 1 {
		for view in views.iter_mut() {
			process(view);
			if view.is_failed() {
				return Ok(true);
			}
		}
		return Ok(false);
	}

	let pool = ThreadPoolBuilder::new()
		.num_threads(parallelism)
		.thread_name(|index| format!("push-views-{index}"))
		.build()
		.map_err(|err| error!(worker_pool_failure(err.to_string())))?;

	let failures = AtomicUsize::new(0);
	// Capture parent span for context propagation to worker threads
	let parent_span = Span::current();

	pool.scope(|scope| {
		for view in views.iter_mut() {
			let failures = &failures;
			let process = &process;
			let parent_span = parent_span.clone();

			scope.spawn(move |_| {
				if failures.load(Ordering::Acquire) > 0 {
					trace!(view = %view.table(), "skipped after another view failed");
					return;
				}

				let _guard = trace_span!(parent: parent_span, "engine::view::task", view = %view.table())
					.entered();

				process(view);
				if view.is_failed() {
					failures.fetch_add(1, Ordering::AcqRel);
				}
			});
		}
	});

	Ok(failures.load(Ordering::Acquire) > 0)
}
