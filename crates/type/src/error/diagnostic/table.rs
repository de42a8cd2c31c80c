// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn table_not_found(table: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_001".to_string(),
		message: format!("Table {table} does not exist"),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
