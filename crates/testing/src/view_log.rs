// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::atomic::{AtomicBool, Ordering};

use cascade_core::{
	Result,
	interface::{ViewLog, ViewLogEntry},
};
use cascade_type::{error::diagnostic::internal::internal, err};
use parking_lot::Mutex;

/// Collects view log entries; can be switched to reject them.
#[derive(Debug, Default)]
pub struct MemoryViewLog {
	entries: Mutex<Vec<ViewLogEntry>>,
	failing: AtomicBool,
}

impl MemoryViewLog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entries(&self) -> Vec<ViewLogEntry> {
		self.entries.lock().clone()
	}

	pub fn clear(&self) {
		self.entries.lock().clear();
	}

	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::Release);
	}
}

impl ViewLog for MemoryViewLog {
	fn log_view(&self, entry: ViewLogEntry) -> Result<()> {
		if self.failing.load(Ordering::Acquire) {
			return err!(internal("view log is unavailable"));
		}
		self.entries.lock().push(entry);
		Ok(())
	}
}
