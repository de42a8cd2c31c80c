// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn internal(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		message: format!("Internal error: {}", reason.into()),
		column: None,
		label: None,
		help: Some("This is an internal error that should never occur in normal operation".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn serde_error(message: String) -> Diagnostic {
	Diagnostic {
		code: "SERDE_001".to_string(),
		message: format!("Serde error: {message}"),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
