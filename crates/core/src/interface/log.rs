// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	time::SystemTime,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
	/// A plain table depending on another table
	Default,
	Materialized,
	Live,
}

impl Display for ViewType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ViewType::Default => f.write_str("default"),
			ViewType::Materialized => f.write_str("materialized"),
			ViewType::Live => f.write_str("live"),
		}
	}
}

/// Last write phase a view completed successfully. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewStatus {
	Init,
	WrittenPrefix,
	WrittenBlock,
	WrittenSuffix,
}

impl Display for ViewStatus {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ViewStatus::Init => f.write_str("init"),
			ViewStatus::WrittenPrefix => f.write_str("written_prefix"),
			ViewStatus::WrittenBlock => f.write_str("written_block"),
			ViewStatus::WrittenSuffix => f.write_str("written_suffix"),
		}
	}
}

/// One record per view and logging point of an insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewLogEntry {
	pub query_id: String,
	pub view_name: String,
	pub view_type: ViewType,
	pub view_query: Option<String>,
	pub event_time: SystemTime,
	pub elapsed_ms: u64,
	pub status: ViewStatus,
	pub exception_code: Option<String>,
	pub exception: Option<String>,
	pub written_rows: u64,
	pub written_bytes: u64,
}

/// Destination of per-view runtime statistics. Failures are reported back
/// but never abort an insert.
pub trait ViewLog: Send + Sync {
	fn log_view(&self, entry: ViewLogEntry) -> crate::Result<()>;
}
