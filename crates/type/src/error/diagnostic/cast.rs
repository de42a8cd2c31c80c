// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;
use crate::{IntoDiagnostic, Type};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CastError {
	#[error("cannot cast column '{column}' from {from} to {to}")]
	Unsupported {
		column: String,
		from: Type,
		to: Type,
	},

	#[error("value {value} of column '{column}' at row {row} cannot be represented as {to}")]
	Lossy {
		column: String,
		row: usize,
		value: String,
		to: Type,
	},
}

impl IntoDiagnostic for CastError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			CastError::Unsupported {
				column,
				..
			} => Diagnostic {
				code: "CAST_001".to_string(),
				message,
				column: Some(column),
				label: Some("unsupported conversion".to_string()),
				help: Some("Change the view query so it produces the target column type".to_string()),
				notes: vec![],
				cause: None,
			},
			CastError::Lossy {
				column,
				..
			} => Diagnostic {
				code: "CAST_002".to_string(),
				message,
				column: Some(column),
				label: Some("lossy conversion".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},
		}
	}
}
