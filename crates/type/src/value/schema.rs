// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashSet, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::{
	Result, Type,
	error::diagnostic::schema::{column_type_mismatch, duplicate_column, unknown_column},
	return_error,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDef {
	pub name: String,
	pub ty: Type,
}

impl ColumnDef {
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}

/// Ordered list of named, typed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
	pub columns: Vec<ColumnDef>,
}

impl Deref for Schema {
	type Target = [ColumnDef];

	fn deref(&self) -> &Self::Target {
		&self.columns
	}
}

impl FromIterator<ColumnDef> for Schema {
	fn from_iter<I: IntoIterator<Item = ColumnDef>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

impl Schema {
	pub fn new(columns: Vec<ColumnDef>) -> Self {
		Self {
			columns,
		}
	}

	pub fn empty() -> Self {
		Self::default()
	}

	pub fn column(&self, name: &str) -> Option<&ColumnDef> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.column(name).is_some()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.columns.iter().map(|c| c.name.as_str())
	}

	/// Subset of this schema in the order given by `names`; unknown names are skipped.
	pub fn project<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Schema {
		names.into_iter().filter_map(|name| self.column(name).cloned()).collect()
	}

	pub fn extended(&self, extra: &[ColumnDef]) -> Schema {
		self.columns.iter().chain(extra.iter()).cloned().collect()
	}

	/// Verifies that every column in `columns` exists in this schema with
	/// the same type and that no column is listed twice.
	pub fn check(&self, table: &str, columns: &[ColumnDef]) -> Result<()> {
		let mut seen = HashSet::with_capacity(columns.len());
		for column in columns {
			if !seen.insert(column.name.as_str()) {
				return_error!(duplicate_column(table, &column.name));
			}
			match self.column(&column.name) {
				None => return_error!(unknown_column(table, &column.name)),
				Some(def) if def.ty != column.ty => {
					return_error!(column_type_mismatch(table, &column.name, &def.ty, &column.ty))
				}
				Some(_) => {}
			}
		}
		Ok(())
	}
}
