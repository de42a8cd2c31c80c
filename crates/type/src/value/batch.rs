// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use crate::{
	Column, ColumnData, ColumnDef, Result, Schema, Value,
	error::diagnostic::{
		batch::{column_length_mismatch, concat_layout_mismatch},
		schema::column_type_mismatch,
	},
	return_error,
};

/// An immutable set of equally long named columns, written as one unit.
///
/// Cloning a batch is cheap, the columns are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
	columns: Arc<Vec<Column>>,
}

impl Deref for Batch {
	type Target = [Column];

	fn deref(&self) -> &Self::Target {
		&self.columns
	}
}

impl Batch {
	pub fn new(columns: Vec<Column>) -> Result<Self> {
		if let Some(first) = columns.first() {
			let expected = first.data.len();
			for column in &columns[1..] {
				if column.data.len() != expected {
					return_error!(column_length_mismatch(&column.name, expected, column.data.len()));
				}
			}
		}
		Ok(Self {
			columns: Arc::new(columns),
		})
	}

	pub fn empty() -> Self {
		Self {
			columns: Arc::new(Vec::new()),
		}
	}

	/// Builds a batch from row-major values; column types are taken from
	/// the first row.
	pub fn from_rows(names: &[&str], rows: &[Vec<Value>]) -> Result<Self> {
		let Some(first) = rows.first() else {
			return Ok(Self::empty());
		};

		let mut columns: Vec<Column> = names
			.iter()
			.zip(first)
			.map(|(name, value)| Column::new(*name, ColumnData::with_capacity(&value.get_type(), rows.len())))
			.collect();

		for row in rows {
			if row.len() != columns.len() {
				return_error!(column_length_mismatch("<row>", columns.len(), row.len()));
			}
			for (column, value) in columns.iter_mut().zip(row.iter().cloned()) {
				if let Err(value) = column.data.push_value(value) {
					return_error!(column_type_mismatch(
						"<rows>",
						&column.name,
						&column.data.get_type(),
						&value.get_type()
					));
				}
			}
		}

		Self::new(columns)
	}

	pub fn row_count(&self) -> usize {
		self.columns.first().map_or(0, |c| c.data.len())
	}

	pub fn is_empty(&self) -> bool {
		self.row_count() == 0
	}

	pub fn column(&self, name: &str) -> Option<&Column> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn schema(&self) -> Schema {
		self.columns.iter().map(|c| ColumnDef::new(c.name.clone(), c.get_type())).collect()
	}

	pub fn size_bytes(&self) -> usize {
		self.columns.iter().map(|c| c.data.size_bytes()).sum()
	}

	pub fn row(&self, index: usize) -> Vec<Value> {
		self.columns.iter().filter_map(|c| c.data.get_value(index)).collect()
	}

	pub fn rows(&self) -> Vec<Vec<Value>> {
		(0..self.row_count()).map(|i| self.row(i)).collect()
	}

	pub fn filter(&self, mask: &[bool]) -> Batch {
		Self {
			columns: Arc::new(
				self.columns.iter().map(|c| Column::new(c.name.clone(), c.data.filter(mask))).collect(),
			),
		}
	}

	pub fn into_columns(self) -> Vec<Column> {
		Arc::unwrap_or_clone(self.columns)
	}

	/// Appends the rows of `batches` in order; all batches must share one layout.
	pub fn concat(batches: &[Batch]) -> Result<Batch> {
		let Some(first) = batches.first() else {
			return Ok(Batch::empty());
		};
		if batches.len() == 1 {
			return Ok(first.clone());
		}

		let layout = first.schema();
		let mut columns = first.columns.as_ref().clone();
		for batch in &batches[1..] {
			if batch.schema() != layout {
				return_error!(concat_layout_mismatch(&describe(&layout), &describe(&batch.schema())));
			}
			for (column, other) in columns.iter_mut().zip(batch.columns.iter()) {
				column.data.extend(&other.data);
			}
		}
		Batch::new(columns)
	}
}

fn describe(schema: &Schema) -> String {
	schema.iter().map(|c| format!("{} {}", c.name, c.ty)).collect::<Vec<_>>().join(", ")
}
