// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cascade_core::{
	Result,
	interface::{Sink, TableDef, TableId},
};
use cascade_type::{Batch, Schema};
use xxhash_rust::xxh3::Xxh3;

use crate::{
	MemoryDatabase,
	database::{FailPoint, SinkEventKind},
};

/// Sink of a table in a [`MemoryDatabase`].
///
/// With deduplication enabled, a batch identical to one stored before is
/// dropped and reported through [`Sink::last_batch_is_duplicate`].
pub struct MemorySink {
	database: MemoryDatabase,
	table: TableId,
	header: Schema,
	deduplicate: bool,
	last_duplicate: bool,
}

impl MemorySink {
	pub fn new(database: MemoryDatabase, table: &TableDef, deduplicate: bool) -> Self {
		Self {
			database,
			table: table.id.clone(),
			header: table.schema.clone(),
			deduplicate,
			last_duplicate: false,
		}
	}
}

impl Sink for MemorySink {
	fn header(&self) -> &Schema {
		&self.header
	}

	fn write_prefix(&mut self) -> Result<()> {
		self.database.run_hooks(&self.table, FailPoint::Prefix)?;
		self.database.record(&self.table, SinkEventKind::Prefix, 0);
		Ok(())
	}

	fn write(&mut self, batch: &Batch) -> Result<()> {
		self.database.run_hooks(&self.table, FailPoint::Write)?;
		self.header.check(&self.table.to_string(), &batch.schema())?;

		let fingerprint = self.deduplicate.then(|| fingerprint(batch));
		let stored = self.database.store(&self.table, batch, fingerprint);
		self.last_duplicate = !stored;

		let kind = if stored {
			SinkEventKind::Write
		} else {
			SinkEventKind::Duplicate
		};
		self.database.record(&self.table, kind, batch.row_count());
		Ok(())
	}

	fn write_suffix(&mut self) -> Result<()> {
		self.database.run_hooks(&self.table, FailPoint::Suffix)?;
		self.database.record(&self.table, SinkEventKind::Suffix, 0);
		Ok(())
	}

	fn flush(&mut self) -> Result<()> {
		self.database.run_hooks(&self.table, FailPoint::Flush)?;
		self.database.record(&self.table, SinkEventKind::Flush, 0);
		Ok(())
	}

	fn last_batch_is_duplicate(&self) -> bool {
		self.last_duplicate
	}
}

fn fingerprint(batch: &Batch) -> u64 {
	let mut hasher = Xxh3::new();
	for column in batch.iter() {
		hasher.update(column.name().as_bytes());
		for row in 0..batch.row_count() {
			if let Some(value) = column.data().get_value(row) {
				hasher.update(value.to_string().as_bytes());
			}
			hasher.update(&[0]);
		}
	}
	hasher.digest()
}
