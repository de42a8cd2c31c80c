// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cascade_core::Result;
use cascade_type::{
	Batch, Column, Schema, error::diagnostic::schema::column_not_found, return_error,
};

/// Reshapes every batch of `input` to `header`, matching columns by name.
pub struct Converting<I> {
	input: I,
	header: Schema,
}

impl<I> Converting<I>
where
	I: Iterator<Item = Result<Batch>>,
{
	pub fn new(input: I, header: Schema) -> Self {
		Self {
			input,
			header,
		}
	}
}

impl<I> Iterator for Converting<I>
where
	I: Iterator<Item = Result<Batch>>,
{
	type Item = Result<Batch>;

	fn next(&mut self) -> Option<Self::Item> {
		let batch = self.input.next()?;
		Some(batch.and_then(|batch| convert_by_name(&batch, &self.header)))
	}
}

/// Selects the columns of `header` from `batch` in header order and casts
/// each to the header type. Columns of `batch` the header does not name are
/// dropped.
pub fn convert_by_name(batch: &Batch, header: &Schema) -> Result<Batch> {
	let mut columns = Vec::with_capacity(header.len());
	for def in header.iter() {
		let Some(column) = batch.column(&def.name) else {
			return_error!(column_not_found(&def.name));
		};
		columns.push(Column::new(def.name.clone(), column.data().cast(&def.name, &def.ty)?));
	}
	Batch::new(columns)
}
