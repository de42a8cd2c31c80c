// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::ColumnData;
use crate::{IntoDiagnostic, Result, Type, error::diagnostic::cast::CastError};

impl ColumnData {
	/// Converts the column to `target`, the way an insert header coerces
	/// the output of a view query.
	///
	/// Supported conversions are `INT8 -> FLOAT8`, `FLOAT8 -> INT8` for
	/// integral values and anything to `UTF8`. Identical types are cloned.
	pub fn cast(&self, column: &str, target: &Type) -> Result<ColumnData> {
		let source = self.get_type();
		if &source == target {
			return Ok(self.clone());
		}

		match (self, target) {
			(ColumnData::Int8(values), Type::Float8) => {
				Ok(ColumnData::Float8(values.iter().map(|v| *v as f64).collect()))
			}
			(ColumnData::Float8(values), Type::Int8) => {
				let mut result = Vec::with_capacity(values.len());
				for (row, value) in values.iter().enumerate() {
					if value.fract() != 0.0 || !value.is_finite() {
						return Err(CastError::Lossy {
							column: column.to_string(),
							row,
							value: value.to_string(),
							to: Type::Int8,
						}
						.into_diagnostic()
						.into());
					}
					result.push(*value as i64);
				}
				Ok(ColumnData::Int8(result))
			}
			(data, Type::Utf8) => Ok(ColumnData::Utf8(
				(0..data.len()).filter_map(|i| data.get_value(i)).map(|v| v.to_string()).collect(),
			)),
			_ => Err(CastError::Unsupported {
				column: column.to_string(),
				from: source,
				to: target.clone(),
			}
			.into_diagnostic()
			.into()),
		}
	}
}
