// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Settings recognised by inserts that push into dependent views.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_INSERT_BLOCK_SIZE: u64 = 1_048_545;
pub const DEFAULT_INSERT_BLOCK_BYTES: u64 = 268_435_456;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Push to dependent views on a worker pool instead of one after another
	pub parallel_view_processing: bool,
	/// Upper bound for the worker pool size
	pub max_threads: usize,
	/// Deduplicate batches in views even when the base table already did
	pub deduplicate_blocks_in_dependent_materialized_views: bool,
	/// Whether sinks acquired under this setting deduplicate inserted batches
	pub insert_deduplicate: bool,
	/// Squash view output until this many rows are accumulated (0 disables)
	pub min_insert_block_size_rows: u64,
	/// Squash view output until this many bytes are accumulated (0 disables)
	pub min_insert_block_size_bytes: u64,
	/// Row threshold used instead of `min_insert_block_size_rows` for view
	/// output (`None` or 0 keeps the insert threshold)
	pub min_insert_block_size_rows_for_materialized_views: Option<u64>,
	pub min_insert_block_size_bytes_for_materialized_views: Option<u64>,
	pub log_queries: bool,
	pub log_query_views: bool,
	/// Views that finished within this many milliseconds are not logged
	pub log_queries_min_query_duration_ms: u64,
	pub lock_acquire_timeout_ms: u64,
	/// Deepest chain of views an insert is allowed to push through
	pub max_view_depth: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			parallel_view_processing: false,
			max_threads: num_cpus::get(),
			deduplicate_blocks_in_dependent_materialized_views: false,
			insert_deduplicate: true,
			min_insert_block_size_rows: DEFAULT_INSERT_BLOCK_SIZE,
			min_insert_block_size_bytes: DEFAULT_INSERT_BLOCK_BYTES,
			min_insert_block_size_rows_for_materialized_views: None,
			min_insert_block_size_bytes_for_materialized_views: None,
			log_queries: true,
			log_query_views: true,
			log_queries_min_query_duration_ms: 0,
			lock_acquire_timeout_ms: 120_000,
			max_view_depth: 64,
		}
	}
}

impl Settings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses settings from a JSON object; absent keys keep their defaults.
	pub fn from_json(json: &str) -> crate::Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn lock_acquire_timeout(&self) -> Duration {
		Duration::from_millis(self.lock_acquire_timeout_ms)
	}

	pub fn parallel_view_processing(mut self, enabled: bool) -> Self {
		self.parallel_view_processing = enabled;
		self
	}

	pub fn max_threads(mut self, threads: usize) -> Self {
		self.max_threads = threads;
		self
	}

	pub fn deduplicate_blocks_in_dependent_materialized_views(mut self, enabled: bool) -> Self {
		self.deduplicate_blocks_in_dependent_materialized_views = enabled;
		self
	}

	pub fn insert_deduplicate(mut self, enabled: bool) -> Self {
		self.insert_deduplicate = enabled;
		self
	}

	pub fn min_insert_block_size(mut self, rows: u64, bytes: u64) -> Self {
		self.min_insert_block_size_rows = rows;
		self.min_insert_block_size_bytes = bytes;
		self
	}

	pub fn min_insert_block_size_for_materialized_views(mut self, rows: Option<u64>, bytes: Option<u64>) -> Self {
		self.min_insert_block_size_rows_for_materialized_views = rows;
		self.min_insert_block_size_bytes_for_materialized_views = bytes;
		self
	}

	pub fn log_query_views(mut self, enabled: bool) -> Self {
		self.log_query_views = enabled;
		self
	}

	pub fn log_queries_min_query_duration_ms(mut self, ms: u64) -> Self {
		self.log_queries_min_query_duration_ms = ms;
		self
	}

	pub fn lock_acquire_timeout_ms(mut self, ms: u64) -> Self {
		self.lock_acquire_timeout_ms = ms;
		self
	}

	pub fn max_view_depth(mut self, depth: usize) -> Self {
		self.max_view_depth = depth;
		self
	}
}
