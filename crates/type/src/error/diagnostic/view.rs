// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// A dependent view failed while one of its write phases ran
pub fn dependent_failure(view: &str, phase: &str, cause: Diagnostic) -> Diagnostic {
	Diagnostic {
		code: "VIEW_001".to_string(),
		message: format!("{}, while {phase} view {view}", cause.message),
		column: None,
		label: Some(view.to_string()),
		help: None,
		notes: vec![format!("while {phase} view {view}")],
		cause: Some(Box::new(cause)),
	}
}

/// Chains of views nested deeper than `max_view_depth`
pub fn view_depth_exceeded(table: &str, depth: usize, max_depth: usize) -> Diagnostic {
	Diagnostic {
		code: "VIEW_002".to_string(),
		message: format!("Pushing to views of {table} reached depth {depth}, the limit is {max_depth}"),
		column: None,
		label: None,
		help: Some("Check for cyclic view definitions or raise max_view_depth".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn worker_pool_failure(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "VIEW_003".to_string(),
		message: format!("Cannot start view worker pool: {}", reason.into()),
		column: None,
		label: None,
		help: Some("Lower max_threads or disable parallel_view_processing".to_string()),
		notes: vec![],
		cause: None,
	}
}
