// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use super::Diagnostic;

/// A shared table lock could not be taken within the configured timeout
pub fn lock_timeout(table: &str, query_id: &str, timeout: Duration) -> Diagnostic {
	Diagnostic {
		code: "LOCK_001".to_string(),
		message: format!(
			"Locking attempt for table {table} by query {query_id} has timed out after {} ms",
			timeout.as_millis()
		),
		column: None,
		label: None,
		help: Some("Possible deadlock avoided. Another query holds an exclusive lock on the table, \
			retry later or raise lock_acquire_timeout_ms"
			.to_string()),
		notes: vec![],
		cause: None,
	}
}
