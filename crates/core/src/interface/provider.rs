// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cascade_type::Batch;

use crate::{
	ExecutionScope,
	interface::{Sink, TableDef},
};

pub trait TableProvider: Send + Sync {
	/// Opens the write endpoint of `table`. The sink sees the settings of
	/// `scope`, e.g. whether it should deduplicate.
	fn acquire_sink(&self, table: &TableDef, scope: &ExecutionScope) -> crate::Result<Box<dyn Sink>>;

	/// Hands a batch to a live view, which keeps no storage of its own.
	fn write_pass_through(&self, table: &TableDef, batch: &Batch, scope: &ExecutionScope) -> crate::Result<()>;
}
