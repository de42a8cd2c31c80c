// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use serde::{Deserialize, Serialize};

pub mod batch;
pub mod cast;
pub mod internal;
pub mod lock;
pub mod schema;
pub mod table;
pub mod view;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub column: Option<String>,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub fn render(&self) -> String {
		let mut out = String::new();
		self.render_into(&mut out, 0);
		out
	}

	fn render_into(&self, out: &mut String, depth: usize) {
		let indent = "  ".repeat(depth);
		let _ = write!(out, "{indent}[{}] {}", self.code, self.message);
		if let Some(column) = &self.column {
			let _ = write!(out, "\n{indent}  column: {column}");
		}
		if let Some(label) = &self.label {
			let _ = write!(out, "\n{indent}  label: {label}");
		}
		for note in &self.notes {
			let _ = write!(out, "\n{indent}  note: {note}");
		}
		if let Some(help) = &self.help {
			let _ = write!(out, "\n{indent}  help: {help}");
		}
		if let Some(cause) = &self.cause {
			let _ = write!(out, "\n{indent}  caused by:\n");
			cause.render_into(out, depth + 1);
		}
	}

	/// Walks the cause chain down to the innermost diagnostic.
	pub fn root_cause(&self) -> &Diagnostic {
		let mut current = self;
		while let Some(cause) = &current.cause {
			current = cause;
		}
		current
	}
}
