// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
};

use cascade_core::{
	ExecutionScope, Result,
	interface::{BatchStream, TransformEvaluator, ViewQuery, ViewSource},
};
use cascade_type::{
	Batch, Column, ColumnDef, Schema, Value, error,
	error::diagnostic::{internal::internal, schema::column_not_found},
	return_error,
};

/// Evaluates a small query language over a single batch:
///
/// ```text
/// SELECT * | col [AS alias], ... [FROM source] [WHERE col op literal]
/// ```
///
/// `op` is one of `=`, `!=`, `<`, `<=`, `>`, `>=`. Literals are integers,
/// floats, `true`, `false` or single-quoted strings without spaces.
#[derive(Debug, Default)]
pub struct QueryEvaluator {
	chunk_rows: AtomicUsize,
}

impl QueryEvaluator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Splits every query result into batches of at most `rows` rows;
	/// zero emits a single batch.
	pub fn set_chunk_rows(&self, rows: usize) {
		self.chunk_rows.store(rows, AtomicOrdering::Release);
	}
}

impl TransformEvaluator for QueryEvaluator {
	fn output_schema(&self, query: &ViewQuery, source: &Schema, _scope: &ExecutionScope) -> Result<Schema> {
		let query = Query::parse(query.text())?;
		match &query.projection {
			Projection::All => Ok(source.clone()),
			Projection::Columns(columns) => columns
				.iter()
				.map(|(name, alias)| match source.column(name) {
					Some(def) => Ok(ColumnDef::new(alias.clone(), def.ty.clone())),
					None => Err(error!(column_not_found(name))),
				})
				.collect::<Result<Vec<_>>>()
				.map(Schema::new),
		}
	}

	fn evaluate(&self, query: &ViewQuery, source: ViewSource, _scope: &ExecutionScope) -> Result<BatchStream> {
		let query = Query::parse(query.text())?;
		let batch = source.batch;

		let filtered = match &query.filter {
			Some(predicate) => {
				let mask = predicate.mask(&batch)?;
				batch.filter(&mask)
			}
			None => batch,
		};

		let projected = match &query.projection {
			Projection::All => filtered,
			Projection::Columns(columns) => {
				let mut projected = Vec::with_capacity(columns.len());
				for (name, alias) in columns {
					let Some(column) = filtered.column(name) else {
						return_error!(column_not_found(name));
					};
					projected.push(Column::new(alias.clone(), column.data().clone()));
				}
				Batch::new(projected)?
			}
		};

		let chunks = chunk(&projected, self.chunk_rows.load(AtomicOrdering::Acquire));
		Ok(Box::new(chunks.into_iter().map(Ok)))
	}
}

fn chunk(batch: &Batch, rows: usize) -> Vec<Batch> {
	let total = batch.row_count();
	if rows == 0 || total <= rows {
		return vec![batch.clone()];
	}

	(0..total)
		.step_by(rows)
		.map(|start| {
			let mask: Vec<bool> = (0..total).map(|row| row >= start && row < start + rows).collect();
			batch.filter(&mask)
		})
		.collect()
}

#[derive(Debug, Clone, PartialEq)]
enum Projection {
	All,
	/// Source column and output name
	Columns(Vec<(String, String)>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Operator {
	Eq,
	NotEq,
	Lt,
	LtEq,
	Gt,
	GtEq,
}

#[derive(Debug, Clone, PartialEq)]
struct Predicate {
	column: String,
	operator: Operator,
	literal: Value,
}

#[derive(Debug, Clone, PartialEq)]
struct Query {
	projection: Projection,
	filter: Option<Predicate>,
}

impl Query {
	fn parse(text: &str) -> Result<Self> {
		let text = text.trim();
		// ASCII uppercasing keeps byte offsets valid for `text`
		let upper = text.to_ascii_uppercase();
		if !upper.starts_with("SELECT ") {
			return_error!(internal(format!("cannot parse query: {text}")));
		}

		let where_at = upper.find(" WHERE ");
		let from_at = upper.find(" FROM ").filter(|from| where_at.is_none_or(|at| *from < at));
		let projection_end = from_at.or(where_at).unwrap_or(text.len());

		let projection = parse_projection(text["SELECT ".len()..projection_end].trim())?;
		let filter = match where_at {
			Some(at) => Some(parse_predicate(text[at + " WHERE ".len()..].trim())?),
			None => None,
		};

		Ok(Self {
			projection,
			filter,
		})
	}
}

fn parse_projection(text: &str) -> Result<Projection> {
	if text == "*" {
		return Ok(Projection::All);
	}

	let mut columns = Vec::new();
	for item in text.split(',') {
		let tokens: Vec<&str> = item.split_whitespace().collect();
		match tokens.as_slice() {
			[name] => columns.push((name.to_string(), name.to_string())),
			[name, keyword, alias] if keyword.eq_ignore_ascii_case("AS") => {
				columns.push((name.to_string(), alias.to_string()))
			}
			_ => return_error!(internal(format!("cannot parse select item: {item}"))),
		}
	}
	Ok(Projection::Columns(columns))
}

fn parse_predicate(text: &str) -> Result<Predicate> {
	let tokens: Vec<&str> = text.split_whitespace().collect();
	let [column, operator, literal] = tokens.as_slice() else {
		return_error!(internal(format!("cannot parse predicate: {text}")));
	};

	let operator = match *operator {
		"=" => Operator::Eq,
		"!=" => Operator::NotEq,
		"<" => Operator::Lt,
		"<=" => Operator::LtEq,
		">" => Operator::Gt,
		">=" => Operator::GtEq,
		other => return_error!(internal(format!("unknown operator: {other}"))),
	};

	Ok(Predicate {
		column: column.to_string(),
		operator,
		literal: parse_literal(literal)?,
	})
}

fn parse_literal(text: &str) -> Result<Value> {
	if let Some(quoted) = text.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
		return Ok(Value::from(quoted));
	}
	if text.eq_ignore_ascii_case("true") {
		return Ok(Value::Boolean(true));
	}
	if text.eq_ignore_ascii_case("false") {
		return Ok(Value::Boolean(false));
	}
	if let Ok(int) = text.parse::<i64>() {
		return Ok(Value::Int8(int));
	}
	if let Ok(float) = text.parse::<f64>() {
		return Ok(Value::Float8(float));
	}
	return_error!(internal(format!("cannot parse literal: {text}")))
}

impl Predicate {
	fn mask(&self, batch: &Batch) -> Result<Vec<bool>> {
		let Some(column) = batch.column(&self.column) else {
			return_error!(column_not_found(&self.column));
		};

		Ok((0..batch.row_count())
			.map(|row| {
				let ordering = column.data().get_value(row).and_then(|value| compare(&value, &self.literal));
				match (ordering, self.operator) {
					(None, _) => false,
					(Some(ordering), Operator::Eq) => ordering == Ordering::Equal,
					(Some(ordering), Operator::NotEq) => ordering != Ordering::Equal,
					(Some(ordering), Operator::Lt) => ordering == Ordering::Less,
					(Some(ordering), Operator::LtEq) => ordering != Ordering::Greater,
					(Some(ordering), Operator::Gt) => ordering == Ordering::Greater,
					(Some(ordering), Operator::GtEq) => ordering != Ordering::Less,
				}
			})
			.collect())
	}
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
	match (left, right) {
		(Value::Boolean(l), Value::Boolean(r)) => Some(l.cmp(r)),
		(Value::Int8(l), Value::Int8(r)) => Some(l.cmp(r)),
		(Value::Float8(l), Value::Float8(r)) => l.partial_cmp(r),
		(Value::Int8(l), Value::Float8(r)) => (*l as f64).partial_cmp(r),
		(Value::Float8(l), Value::Int8(r)) => l.partial_cmp(&(*r as f64)),
		(Value::Utf8(l), Value::Utf8(r)) => Some(l.cmp(r)),
		_ => None,
	}
}
