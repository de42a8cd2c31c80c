// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::Any,
	fmt::{Debug, Formatter},
	time::Duration,
};

use crate::interface::TableId;

pub trait LockManager: Send + Sync {
	/// Takes a shared lock on `table`, waiting at most `timeout`.
	fn acquire_shared(&self, table: &TableId, query_id: &str, timeout: Duration) -> crate::Result<TableLock>;
}

/// A held table lock, released on drop.
pub struct TableLock {
	table: TableId,
	_guard: Box<dyn Any + Send + Sync>,
}

impl TableLock {
	pub fn new(table: TableId, guard: impl Send + Sync + 'static) -> Self {
		Self {
			table,
			_guard: Box::new(guard),
		}
	}

	pub fn table(&self) -> &TableId {
		&self.table
	}
}

impl Debug for TableLock {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TableLock").field("table", &self.table).finish()
	}
}
