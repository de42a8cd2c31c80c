// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::mem;

use cascade_core::Result;
use cascade_type::Batch;

/// Merges small batches until they reach a row or byte threshold.
///
/// A batch that is large enough on its own passes through unchanged, after
/// whatever was accumulated before it. Empty batches are dropped and the
/// remainder is emitted when the input ends. A threshold of zero disables
/// that dimension; with both disabled every batch passes through.
pub struct Squashing<I> {
	input: I,
	min_rows: u64,
	min_bytes: u64,
	accumulated: Vec<Batch>,
	accumulated_rows: usize,
	accumulated_bytes: usize,
	pending: Option<Batch>,
	finished: bool,
}

impl<I> Squashing<I>
where
	I: Iterator<Item = Result<Batch>>,
{
	pub fn new(input: I, min_rows: u64, min_bytes: u64) -> Self {
		Self {
			input,
			min_rows,
			min_bytes,
			accumulated: Vec::new(),
			accumulated_rows: 0,
			accumulated_bytes: 0,
			pending: None,
			finished: false,
		}
	}

	fn is_enough(&self, rows: usize, bytes: usize) -> bool {
		(self.min_rows == 0 && self.min_bytes == 0)
			|| (self.min_rows > 0 && rows as u64 >= self.min_rows)
			|| (self.min_bytes > 0 && bytes as u64 >= self.min_bytes)
	}

	fn append(&mut self, batch: Batch) {
		self.accumulated_rows += batch.row_count();
		self.accumulated_bytes += batch.size_bytes();
		self.accumulated.push(batch);
	}

	fn take_accumulated(&mut self) -> Result<Option<Batch>> {
		self.accumulated_rows = 0;
		self.accumulated_bytes = 0;
		match mem::take(&mut self.accumulated).as_slice() {
			[] => Ok(None),
			[single] => Ok(Some(single.clone())),
			batches => Batch::concat(batches).map(Some),
		}
	}
}

impl<I> Iterator for Squashing<I>
where
	I: Iterator<Item = Result<Batch>>,
{
	type Item = Result<Batch>;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(batch) = self.pending.take() {
			return Some(Ok(batch));
		}
		if self.finished {
			return None;
		}

		loop {
			let batch = match self.input.next() {
				None => {
					self.finished = true;
					return self.take_accumulated().transpose();
				}
				Some(Err(err)) => {
					self.finished = true;
					return Some(Err(err));
				}
				Some(Ok(batch)) => batch,
			};

			if batch.is_empty() {
				continue;
			}

			if self.is_enough(batch.row_count(), batch.size_bytes()) {
				if self.accumulated.is_empty() {
					return Some(Ok(batch));
				}
				self.pending = Some(batch);
				return self.take_accumulated().transpose();
			}

			self.append(batch);
			if self.is_enough(self.accumulated_rows, self.accumulated_bytes) {
				return self.take_accumulated().transpose();
			}
		}
	}
}
