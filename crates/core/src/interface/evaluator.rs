// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cascade_type::{Batch, Schema};

use crate::{
	ExecutionScope,
	interface::{TableId, ViewQuery},
};

pub type BatchStream = Box<dyn Iterator<Item = crate::Result<Batch>> + Send>;

/// Stand-in for the source table of a view that contains nothing but the
/// batch just inserted.
#[derive(Debug, Clone)]
pub struct ViewSource {
	pub table: TableId,
	pub schema: Schema,
	pub batch: Batch,
}

pub trait TransformEvaluator: Send + Sync {
	/// Columns produced by `query` when it reads from a table shaped like `source`.
	fn output_schema(&self, query: &ViewQuery, source: &Schema, scope: &ExecutionScope) -> crate::Result<Schema>;

	/// Runs `query` over `source`; output batches are produced lazily.
	fn evaluate(&self, query: &ViewQuery, source: ViewSource, scope: &ExecutionScope) -> crate::Result<BatchStream>;
}
