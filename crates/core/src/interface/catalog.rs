// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use crate::interface::{TableDef, TableId};

/// Tables and views registered as depending on a table.
pub trait DependencyResolver: Send + Sync {
	/// Direct dependents only; dependents of dependents are resolved by the
	/// coordinators built for them.
	fn dependents(&self, table: &TableId) -> crate::Result<Vec<TableId>>;
}

pub trait TableCatalog: Send + Sync {
	fn table(&self, table: &TableId) -> crate::Result<Arc<TableDef>>;
}
