// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use cascade_type::{ColumnDef, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId {
	pub namespace: String,
	pub name: String,
}

impl TableId {
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			name: name.into(),
		}
	}
}

impl Display for TableId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.namespace, self.name)
	}
}

/// The defining query of a view, opaque to everything but the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewQuery(pub Arc<str>);

impl ViewQuery {
	pub fn new(text: impl AsRef<str>) -> Self {
		Self(Arc::from(text.as_ref()))
	}

	pub fn text(&self) -> &str {
		&self.0
	}
}

impl Display for ViewQuery {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableKind {
	Table,
	/// Rows of `target` are produced by running `query` over every batch
	/// inserted into the view's source table.
	MaterializedView {
		query: ViewQuery,
		target: TableId,
	},
	/// Receives inserted batches as they are; `query` is only informative.
	LiveView {
		query: ViewQuery,
	},
}

/// Snapshot of a table definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
	pub id: TableId,
	pub schema: Schema,
	pub virtual_columns: Vec<ColumnDef>,
	pub kind: TableKind,
	pub deduplicates: bool,
}

impl TableDef {
	pub fn table(id: TableId, schema: Schema) -> Self {
		Self {
			id,
			schema,
			virtual_columns: Vec::new(),
			kind: TableKind::Table,
			deduplicates: false,
		}
	}

	pub fn materialized_view(id: TableId, query: ViewQuery, target: TableId) -> Self {
		Self {
			id,
			schema: Schema::empty(),
			virtual_columns: Vec::new(),
			kind: TableKind::MaterializedView {
				query,
				target,
			},
			deduplicates: false,
		}
	}

	pub fn live_view(id: TableId, schema: Schema, query: ViewQuery) -> Self {
		Self {
			id,
			schema,
			virtual_columns: Vec::new(),
			kind: TableKind::LiveView {
				query,
			},
			deduplicates: false,
		}
	}

	pub fn with_virtual_columns(mut self, columns: Vec<ColumnDef>) -> Self {
		self.virtual_columns = columns;
		self
	}

	pub fn with_deduplication(mut self, deduplicates: bool) -> Self {
		self.deduplicates = deduplicates;
		self
	}

	pub fn name(&self) -> String {
		self.id.to_string()
	}

	pub fn is_live_view(&self) -> bool {
		matches!(self.kind, TableKind::LiveView { .. })
	}

	/// Physical columns followed by virtual ones.
	pub fn schema_with_virtuals(&self) -> Schema {
		self.schema.extended(&self.virtual_columns)
	}
}
