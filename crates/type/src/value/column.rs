// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::{Type, Value};

mod cast;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
	pub name: String,
	pub data: ColumnData,
}

impl Column {
	pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
		Self {
			name: name.into(),
			data,
		}
	}

	pub fn bool(name: impl Into<String>, data: impl IntoIterator<Item = bool>) -> Self {
		Self::new(name, ColumnData::bool(data))
	}

	pub fn int8(name: impl Into<String>, data: impl IntoIterator<Item = i64>) -> Self {
		Self::new(name, ColumnData::int8(data))
	}

	pub fn float8(name: impl Into<String>, data: impl IntoIterator<Item = f64>) -> Self {
		Self::new(name, ColumnData::float8(data))
	}

	pub fn utf8<S: Into<String>>(name: impl Into<String>, data: impl IntoIterator<Item = S>) -> Self {
		Self::new(name, ColumnData::utf8(data))
	}

	pub fn array(name: impl Into<String>, element: Type, rows: Vec<Vec<Value>>) -> Self {
		Self::new(name, ColumnData::array(element, rows))
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn data(&self) -> &ColumnData {
		&self.data
	}

	pub fn get_type(&self) -> Type {
		self.data.get_type()
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
	Bool(Vec<bool>),
	Int8(Vec<i64>),
	Float8(Vec<f64>),
	Utf8(Vec<String>),
	Array {
		element: Type,
		rows: Vec<Vec<Value>>,
	},
}

impl ColumnData {
	pub fn bool(data: impl IntoIterator<Item = bool>) -> Self {
		ColumnData::Bool(data.into_iter().collect())
	}

	pub fn int8(data: impl IntoIterator<Item = i64>) -> Self {
		ColumnData::Int8(data.into_iter().collect())
	}

	pub fn float8(data: impl IntoIterator<Item = f64>) -> Self {
		ColumnData::Float8(data.into_iter().collect())
	}

	pub fn utf8<S: Into<String>>(data: impl IntoIterator<Item = S>) -> Self {
		ColumnData::Utf8(data.into_iter().map(Into::into).collect())
	}

	pub fn array(element: Type, rows: Vec<Vec<Value>>) -> Self {
		ColumnData::Array {
			element,
			rows,
		}
	}

	pub fn with_capacity(ty: &Type, capacity: usize) -> Self {
		match ty {
			Type::Boolean => ColumnData::Bool(Vec::with_capacity(capacity)),
			Type::Int8 => ColumnData::Int8(Vec::with_capacity(capacity)),
			Type::Float8 => ColumnData::Float8(Vec::with_capacity(capacity)),
			Type::Utf8 => ColumnData::Utf8(Vec::with_capacity(capacity)),
			Type::Array(element) => ColumnData::Array {
				element: element.as_ref().clone(),
				rows: Vec::with_capacity(capacity),
			},
		}
	}

	/// A column of `len` default values: `false`, `0`, `0.0`, `""` or `[]`.
	pub fn defaults(ty: &Type, len: usize) -> Self {
		match ty {
			Type::Boolean => ColumnData::Bool(vec![false; len]),
			Type::Int8 => ColumnData::Int8(vec![0; len]),
			Type::Float8 => ColumnData::Float8(vec![0.0; len]),
			Type::Utf8 => ColumnData::Utf8(vec![String::new(); len]),
			Type::Array(element) => ColumnData::Array {
				element: element.as_ref().clone(),
				rows: vec![Vec::new(); len],
			},
		}
	}

	pub fn get_type(&self) -> Type {
		match self {
			ColumnData::Bool(_) => Type::Boolean,
			ColumnData::Int8(_) => Type::Int8,
			ColumnData::Float8(_) => Type::Float8,
			ColumnData::Utf8(_) => Type::Utf8,
			ColumnData::Array {
				element,
				..
			} => Type::Array(Box::new(element.clone())),
		}
	}

	pub fn len(&self) -> usize {
		match self {
			ColumnData::Bool(v) => v.len(),
			ColumnData::Int8(v) => v.len(),
			ColumnData::Float8(v) => v.len(),
			ColumnData::Utf8(v) => v.len(),
			ColumnData::Array {
				rows,
				..
			} => rows.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get_value(&self, index: usize) -> Option<Value> {
		match self {
			ColumnData::Bool(v) => v.get(index).map(|v| Value::Boolean(*v)),
			ColumnData::Int8(v) => v.get(index).map(|v| Value::Int8(*v)),
			ColumnData::Float8(v) => v.get(index).map(|v| Value::Float8(*v)),
			ColumnData::Utf8(v) => v.get(index).map(|v| Value::Utf8(v.clone())),
			ColumnData::Array {
				rows,
				..
			} => rows.get(index).map(|v| Value::Array(v.clone())),
		}
	}

	/// Number of array elements in `row`, `None` for scalar columns.
	pub fn array_len(&self, row: usize) -> Option<usize> {
		match self {
			ColumnData::Array {
				rows,
				..
			} => rows.get(row).map(Vec::len),
			_ => None,
		}
	}

	/// Appends a value, handing it back when its type does not fit the column.
	pub fn push_value(&mut self, value: Value) -> Result<(), Value> {
		match (self, value) {
			(ColumnData::Bool(v), Value::Boolean(x)) => v.push(x),
			(ColumnData::Int8(v), Value::Int8(x)) => v.push(x),
			(ColumnData::Float8(v), Value::Float8(x)) => v.push(x),
			(ColumnData::Utf8(v), Value::Utf8(x)) => v.push(x),
			(
				ColumnData::Array {
					rows,
					..
				},
				Value::Array(x),
			) => rows.push(x),
			(_, value) => return Err(value),
		}
		Ok(())
	}

	/// Appends all rows of `other`; both sides must have the same type.
	pub fn extend(&mut self, other: &ColumnData) -> bool {
		match (self, other) {
			(ColumnData::Bool(a), ColumnData::Bool(b)) => a.extend_from_slice(b),
			(ColumnData::Int8(a), ColumnData::Int8(b)) => a.extend_from_slice(b),
			(ColumnData::Float8(a), ColumnData::Float8(b)) => a.extend_from_slice(b),
			(ColumnData::Utf8(a), ColumnData::Utf8(b)) => a.extend_from_slice(b),
			(
				ColumnData::Array {
					element: ea,
					rows: a,
				},
				ColumnData::Array {
					element: eb,
					rows: b,
				},
			) if *ea == *eb => a.extend_from_slice(b),
			_ => return false,
		}
		true
	}

	pub fn filter(&self, mask: &[bool]) -> ColumnData {
		fn keep<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
			values.iter().zip(mask).filter(|(_, keep)| **keep).map(|(v, _)| v.clone()).collect()
		}

		match self {
			ColumnData::Bool(v) => ColumnData::Bool(keep(v, mask)),
			ColumnData::Int8(v) => ColumnData::Int8(keep(v, mask)),
			ColumnData::Float8(v) => ColumnData::Float8(keep(v, mask)),
			ColumnData::Utf8(v) => ColumnData::Utf8(keep(v, mask)),
			ColumnData::Array {
				element,
				rows,
			} => ColumnData::Array {
				element: element.clone(),
				rows: keep(rows, mask),
			},
		}
	}

	/// Approximate in-memory footprint, used for squashing thresholds.
	pub fn size_bytes(&self) -> usize {
		match self {
			ColumnData::Bool(v) => v.len(),
			ColumnData::Int8(v) => v.len() * 8,
			ColumnData::Float8(v) => v.len() * 8,
			ColumnData::Utf8(v) => v.iter().map(|s| s.len() + 8).sum(),
			ColumnData::Array {
				rows,
				..
			} => rows.iter().map(|row| 8 + row.iter().map(Value::size_bytes).sum::<usize>()).sum(),
		}
	}
}
