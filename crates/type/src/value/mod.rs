// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod batch;
pub mod column;
pub mod nested;
pub mod schema;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
	Boolean,
	Int8,
	Float8,
	Utf8,
	Array(Box<Type>),
}

impl Type {
	pub fn is_array(&self) -> bool {
		matches!(self, Type::Array(_))
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("UTF8"),
			Type::Array(inner) => write!(f, "ARRAY({inner})"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	Boolean(bool),
	Int8(i64),
	Float8(f64),
	Utf8(String),
	Array(Vec<Value>),
}

impl Value {
	pub fn get_type(&self) -> Type {
		match self {
			Value::Boolean(_) => Type::Boolean,
			Value::Int8(_) => Type::Int8,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
			Value::Array(items) => Type::Array(Box::new(items.first().map_or(Type::Int8, Value::get_type))),
		}
	}

	/// Approximate in-memory footprint, used for squashing thresholds.
	pub fn size_bytes(&self) -> usize {
		match self {
			Value::Boolean(_) => 1,
			Value::Int8(_) | Value::Float8(_) => 8,
			Value::Utf8(s) => s.len() + 8,
			Value::Array(items) => 8 + items.iter().map(Value::size_bytes).sum::<usize>(),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Boolean(v) => write!(f, "{v}"),
			Value::Int8(v) => write!(f, "{v}"),
			Value::Float8(v) => write!(f, "{v}"),
			Value::Utf8(v) => f.write_str(v),
			Value::Array(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}
