// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use cascade_core::{
	ExecutionScope, Result,
	interface::{Sink, TableCatalog, TableDef, TableProvider},
};
use cascade_engine::{FanOutCoordinator, InsertTarget, execute_insert};
use cascade_testing::{MemoryDatabase, MemorySink};
use cascade_type::{Batch, Column, ColumnDef, Schema, Type};

use crate::{create_copy, create_materialized_view, order_row, orders_batch, orders_schema, settings, shop, table_id};

#[test]
fn test_lock_timeout_on_target() {
	let db = shop();
	let orders = table_id("orders");
	let _lock = db.hold_exclusive(&orders);

	let scope = db.scope(settings().lock_acquire_timeout_ms(20));
	let err = FanOutCoordinator::new(&scope, InsertTarget::new(db.table(&orders).unwrap())).err().unwrap();

	assert_eq!(err.code, "LOCK_001");
	assert!(err.message.contains("shop.orders"), "{}", err.message);
}

#[test]
fn test_lock_timeout_on_materialized_view() {
	let db = shop();
	let orders = table_id("orders");
	create_materialized_view(&db, "orders_mv", "SELECT *", &orders, "orders_copy", orders_schema());
	let _lock = db.hold_exclusive(&table_id("orders_mv"));

	let scope = db.scope(settings().lock_acquire_timeout_ms(20));
	let err = execute_insert(&scope, &orders, [orders_batch(&[(1, "eu", 1.0)])]).unwrap_err();

	assert_eq!(err.code, "LOCK_001");
	assert!(db.batches(&orders).is_empty());
}

#[test]
fn test_locks_released_with_coordinator() {
	let db = shop();
	let orders = table_id("orders");
	let scope = db.scope(settings().lock_acquire_timeout_ms(20));

	let coordinator = FanOutCoordinator::new(&scope, InsertTarget::new(db.table(&orders).unwrap())).unwrap();
	drop(coordinator);

	let _lock = db.hold_exclusive(&orders);
}

/// Hands out sinks whose layout differs from the catalog.
struct StaleProvider(MemoryDatabase);

impl TableProvider for StaleProvider {
	fn acquire_sink(&self, table: &TableDef, _scope: &ExecutionScope) -> Result<Box<dyn Sink>> {
		let mut stale = table.clone();
		stale.schema = Schema::new(vec![ColumnDef::new("id", Type::Utf8)]);
		Ok(Box::new(MemorySink::new(self.0.clone(), &stale, false)))
	}

	fn write_pass_through(&self, table: &TableDef, batch: &Batch, scope: &ExecutionScope) -> Result<()> {
		self.0.write_pass_through(table, batch, scope)
	}
}

#[test]
fn test_sink_schema_mismatch() {
	let db = shop();
	let orders = table_id("orders");
	let mut services = db.services();
	services.provider = Arc::new(StaleProvider(db.clone()));
	let scope = ExecutionScope::new(services, settings(), "test-query");

	let err = FanOutCoordinator::new(&scope, InsertTarget::new(db.table(&orders).unwrap())).err().unwrap();
	assert_eq!(err.code, "SCHEMA_001");
	assert_eq!(err.column.as_deref(), Some("id"));
}

#[test]
fn test_unknown_insert_column() {
	let db = shop();
	let scope = db.scope(settings());
	let target = InsertTarget::new(db.table(&table_id("orders")).unwrap()).columns(["id", "discount"]);

	let err = FanOutCoordinator::new(&scope, target).err().unwrap();
	assert_eq!(err.code, "SCHEMA_001");
	assert_eq!(err.column.as_deref(), Some("discount"));
}

#[test]
fn test_effective_header() {
	let db = shop();
	let orders = db.table(&table_id("orders")).unwrap();
	let scope = db.scope(settings());

	let full = FanOutCoordinator::new(&scope, InsertTarget::new(orders.clone())).unwrap();
	assert_eq!(full.header(), &orders_schema());

	let partial = FanOutCoordinator::new(&scope, InsertTarget::new(orders.clone()).columns(["amount", "id"])).unwrap();
	assert_eq!(
		partial.header(),
		&Schema::new(vec![ColumnDef::new("amount", Type::Float8), ColumnDef::new("id", Type::Int8)])
	);

	let with_virtuals = db.create_table(
		TableDef::table(table_id("tagged"), orders_schema())
			.with_virtual_columns(vec![ColumnDef::new("_partition", Type::Int8)]),
	);
	let headless = FanOutCoordinator::new(&scope, InsertTarget::new(with_virtuals.clone()).no_destination()).unwrap();
	assert!(!headless.has_destination());
	assert_eq!(headless.header(), &with_virtuals.schema_with_virtuals());
}

#[test]
fn test_view_chain_deeper_than_limit() {
	let db = shop();
	let orders = table_id("orders");
	let first = create_copy(&db, "first", &orders);
	create_copy(&db, "second", &first);

	let scope = db.scope(settings().max_view_depth(1));
	let err = FanOutCoordinator::new(&scope, InsertTarget::new(db.table(&orders).unwrap())).err().unwrap();
	assert_eq!(err.code, "VIEW_002");

	let scope = db.scope(settings().max_view_depth(2));
	assert!(FanOutCoordinator::new(&scope, InsertTarget::new(db.table(&orders).unwrap())).is_ok());
}

#[test]
fn test_cyclic_views_are_rejected() {
	let db = shop();
	let orders = table_id("orders");
	let mirror = create_copy(&db, "mirror", &orders);
	db.add_dependent(&mirror, orders.clone());

	let scope = db.scope(settings().max_view_depth(8));
	let err = execute_insert(&scope, &orders, [orders_batch(&[(1, "eu", 1.0)])]).unwrap_err();
	assert_eq!(err.code, "VIEW_002");
}

#[test]
fn test_insert_into_missing_table() {
	let db = shop();
	let err = execute_insert(&db.scope(settings()), &table_id("missing"), Vec::<Batch>::new()).unwrap_err();
	assert_eq!(err.code, "TABLE_001");
}

#[test]
fn test_partial_insert_fills_defaults() {
	let db = shop();
	let orders = db.table(&table_id("orders")).unwrap();
	let scope = db.scope(settings());

	let mut coordinator = FanOutCoordinator::new(&scope, InsertTarget::new(orders.clone()).columns(["id"])).unwrap();
	coordinator.write(&Batch::new(vec![Column::int8("id", [9])]).unwrap()).unwrap();

	assert_eq!(db.rows(&orders.id), vec![order_row(9, "", 0.0)]);
}

#[test]
fn test_forked_scope_keeps_parent_settings() {
	let db = shop();
	let scope = db.scope(settings().insert_deduplicate(true));

	let child = scope
		.fork(|settings| {
			settings.insert_deduplicate = false;
		})
		.nested();

	assert!(scope.settings().insert_deduplicate);
	assert!(!child.settings().insert_deduplicate);
	assert_eq!(scope.depth(), 0);
	assert_eq!(child.depth(), 1);
	assert_eq!(child.query_id(), scope.query_id());
}
