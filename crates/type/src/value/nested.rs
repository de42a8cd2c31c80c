// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Consistency of nested data structures.
//!
//! A nested structure `n` is stored as sibling array columns `n.a`, `n.b`,
//! ... Storage assumes the arrays of one row have the same length in every
//! sibling, so batches are checked before they are written anywhere.

use std::collections::HashMap;

use crate::{Batch, Column, Result, error::diagnostic::batch::nested_size_mismatch, return_error};

/// Name of the nested group a column belongs to, if any.
pub fn nested_group(name: &str) -> Option<&str> {
	name.split_once('.').map(|(group, _)| group).filter(|group| !group.is_empty())
}

pub fn validate_nested_sizes(batch: &Batch) -> Result<()> {
	let mut groups: HashMap<&str, &Column> = HashMap::new();

	for column in batch.iter() {
		if !column.get_type().is_array() {
			continue;
		}
		let Some(group) = nested_group(&column.name) else {
			continue;
		};

		let Some(first) = groups.get(group).copied() else {
			groups.insert(group, column);
			continue;
		};

		for row in 0..batch.row_count() {
			let expected = first.data.array_len(row).unwrap_or(0);
			let actual = column.data.array_len(row).unwrap_or(0);
			if expected != actual {
				return_error!(nested_size_mismatch(
					group,
					&first.name,
					expected,
					&column.name,
					actual,
					row
				));
			}
		}
	}

	Ok(())
}
