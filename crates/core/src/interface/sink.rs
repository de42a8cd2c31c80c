// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cascade_type::{Batch, Schema};

/// Write endpoint of a table.
///
/// Calls arrive as `write_prefix`, any number of `write`, `write_suffix`
/// and finally `flush`.
pub trait Sink: Send {
	/// Layout batches passed to [`Sink::write`] must conform to.
	fn header(&self) -> &Schema;

	fn write_prefix(&mut self) -> crate::Result<()> {
		Ok(())
	}

	fn write(&mut self, batch: &Batch) -> crate::Result<()>;

	fn write_suffix(&mut self) -> crate::Result<()> {
		Ok(())
	}

	fn flush(&mut self) -> crate::Result<()> {
		Ok(())
	}

	/// Whether the last written batch was dropped as a duplicate of an
	/// earlier insert.
	fn last_batch_is_duplicate(&self) -> bool {
		false
	}
}
