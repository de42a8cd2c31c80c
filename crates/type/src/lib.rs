// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod value;

pub use error::{Error, IntoDiagnostic, diagnostic::Diagnostic};
pub use value::{
	Type, Value,
	batch::Batch,
	column::{Column, ColumnData},
	nested::validate_nested_sizes,
	schema::{ColumnDef, Schema},
};

pub type Result<T> = std::result::Result<T, Error>;
