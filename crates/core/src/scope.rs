// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use crate::{
	Settings,
	interface::{DependencyResolver, LockManager, TableCatalog, TableProvider, TransformEvaluator, ViewLog},
};

/// External collaborators an insert talks to.
#[derive(Clone)]
pub struct Services {
	pub resolver: Arc<dyn DependencyResolver>,
	pub catalog: Arc<dyn TableCatalog>,
	pub provider: Arc<dyn TableProvider>,
	pub evaluator: Arc<dyn TransformEvaluator>,
	pub locks: Arc<dyn LockManager>,
	pub view_log: Arc<dyn ViewLog>,
}

/// Settings and services of one insert, handed explicitly through every
/// call instead of living in a global.
///
/// Forking copies the settings, so overrides made for dependent views never
/// leak back into the scope they were forked from.
#[derive(Clone)]
pub struct ExecutionScope {
	settings: Arc<Settings>,
	services: Arc<Services>,
	query_id: Arc<str>,
	depth: usize,
}

impl ExecutionScope {
	pub fn new(services: Services, settings: Settings, query_id: impl AsRef<str>) -> Self {
		Self {
			settings: Arc::new(settings),
			services: Arc::new(services),
			query_id: Arc::from(query_id.as_ref()),
			depth: 0,
		}
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn services(&self) -> &Services {
		&self.services
	}

	pub fn query_id(&self) -> &str {
		&self.query_id
	}

	/// Number of view levels between this scope and the insert statement.
	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn fork(&self, configure: impl FnOnce(&mut Settings)) -> Self {
		let mut settings = self.settings.as_ref().clone();
		configure(&mut settings);
		Self {
			settings: Arc::new(settings),
			services: self.services.clone(),
			query_id: self.query_id.clone(),
			depth: self.depth,
		}
	}

	/// Scope for the next view level.
	pub fn nested(&self) -> Self {
		Self {
			depth: self.depth + 1,
			..self.clone()
		}
	}
}
