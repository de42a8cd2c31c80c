// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// Array columns of one nested group disagree on the element count of a row
pub fn nested_size_mismatch(
	group: &str,
	first: &str,
	first_len: usize,
	other: &str,
	other_len: usize,
	row: usize,
) -> Diagnostic {
	Diagnostic {
		code: "BATCH_001".to_string(),
		message: format!(
			"Elements '{first}' and '{other}' of nested data structure '{group}' have different array sizes \
			 ({first_len} and {other_len}) at row {row}"
		),
		column: Some(other.to_string()),
		label: Some("malformed batch".to_string()),
		help: Some(format!("Every array column of '{group}' must have the same number of elements per row")),
		notes: vec![],
		cause: None,
	}
}

/// Columns of one batch have different row counts
pub fn column_length_mismatch(column: &str, expected: usize, actual: usize) -> Diagnostic {
	Diagnostic {
		code: "BATCH_002".to_string(),
		message: format!("Column '{column}' has {actual} rows, expected {expected}"),
		column: Some(column.to_string()),
		label: None,
		help: Some("All columns of a batch must have the same number of rows".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Batches with different column layouts cannot be concatenated
pub fn concat_layout_mismatch(expected: &str, actual: &str) -> Diagnostic {
	Diagnostic {
		code: "BATCH_003".to_string(),
		message: format!("Cannot concatenate batches with layouts ({expected}) and ({actual})"),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
