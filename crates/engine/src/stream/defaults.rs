// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cascade_core::{Result, interface::TableDef};
use cascade_type::{Batch, Column, ColumnData};

/// Widens a batch carrying a subset of `table`'s columns to the full
/// physical layout, filling absent columns with type defaults.
pub fn complete_with_defaults(batch: &Batch, table: &TableDef) -> Result<Batch> {
	table.schema.check(&table.name(), &batch.schema())?;

	let rows = batch.row_count();
	let columns = table
		.schema
		.iter()
		.map(|def| match batch.column(&def.name) {
			Some(column) => column.clone(),
			None => Column::new(def.name.clone(), ColumnData::defaults(&def.ty, rows)),
		})
		.collect();

	Batch::new(columns)
}
