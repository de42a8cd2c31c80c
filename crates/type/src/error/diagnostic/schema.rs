// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;
use crate::Type;

/// A column supplied to a table does not match its schema snapshot
pub fn schema_mismatch(table: &str, column: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_001".to_string(),
		message: format!("Schema mismatch for table {table}: {}", reason.into()),
		column: Some(column.to_string()),
		label: None,
		help: Some("The table definition changed while the insert was being prepared".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn unknown_column(table: &str, column: &str) -> Diagnostic {
	schema_mismatch(table, column, format!("there is no column '{column}'"))
}

pub fn column_type_mismatch(table: &str, column: &str, expected: &Type, actual: &Type) -> Diagnostic {
	schema_mismatch(table, column, format!("column '{column}' has type {actual}, expected {expected}"))
}

pub fn duplicate_column(table: &str, column: &str) -> Diagnostic {
	schema_mismatch(table, column, format!("column '{column}' is specified more than once"))
}

/// The converting stream did not find a header column in the source batch
pub fn column_not_found(column: &str) -> Diagnostic {
	Diagnostic {
		code: "SCHEMA_002".to_string(),
		message: format!("Cannot find column '{column}' in source batch"),
		column: Some(column.to_string()),
		label: None,
		help: Some("The view query must produce every column of the insert header".to_string()),
		notes: vec![],
		cause: None,
	}
}
