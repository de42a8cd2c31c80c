// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{iter, sync::Arc};

use cascade_core::{
	ExecutionContext, ExecutionScope, Result,
	interface::{BatchStream, TableCatalog, TableDef, TransformEvaluator, ViewQuery, ViewSource, ViewStatus},
};
use cascade_engine::{FanOutCoordinator, InsertTarget};
use cascade_testing::{FailPoint, SinkEventKind};
use cascade_type::{Batch, Column, ColumnDef, Schema, Type, Value};

use crate::{coordinator, create_live_view, create_materialized_view, orders_batch, orders_schema, settings, shop, table_id};

#[test]
fn test_serial_failure_stops_at_first_failing_view() {
	let db = shop();
	let orders = table_id("orders");
	let copy = create_materialized_view(&db, "a_mv", "SELECT *", &orders, "a", orders_schema());
	let live = create_live_view(&db, "b_live", &orders);
	db.fail_on(&copy, FailPoint::Write);

	let mut coordinator = coordinator(&db, settings().parallel_view_processing(false));
	let err = coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap_err();

	assert_eq!(err.code, "VIEW_001");
	assert_eq!(err.cause.as_ref().map(|cause| cause.code.as_str()), Some("INTERNAL_ERROR"));
	assert!(err.message.contains("while pushing to view shop.a_mv"), "{}", err.message);

	let views = coordinator.views();
	assert!(views[0].is_failed());
	assert_eq!(views[0].status(), ViewStatus::Init);
	assert!(!views[1].is_failed());
	assert_eq!(views[1].status(), ViewStatus::Init);
	assert!(db.received(&live).is_empty());

	// the direct write happened before the views were pushed to
	assert_eq!(db.batches(&orders).len(), 1);
}

#[test]
fn test_malformed_batch_touches_nothing() {
	let db = shop();
	let carts = table_id("carts");
	let schema = Schema::new(vec![
		ColumnDef::new("id", Type::Int8),
		ColumnDef::new("items.sku", Type::Array(Box::new(Type::Utf8))),
		ColumnDef::new("items.qty", Type::Array(Box::new(Type::Int8))),
	]);
	db.create_table(TableDef::table(carts.clone(), schema.clone()));
	let copy = create_materialized_view(&db, "carts_mv", "SELECT *", &carts, "carts_copy", schema);

	let scope = db.scope(settings());
	let mut coordinator = FanOutCoordinator::new(&scope, InsertTarget::new(db.table(&carts).unwrap())).unwrap();

	let batch = Batch::new(vec![
		Column::int8("id", [1]),
		Column::array("items.sku", Type::Utf8, vec![vec![Value::from("a"), Value::from("b")]]),
		Column::array("items.qty", Type::Int8, vec![vec![Value::Int8(1)]]),
	])
	.unwrap();

	let err = coordinator.write(&batch).unwrap_err();
	assert_eq!(err.code, "BATCH_001");

	assert!(db.batches(&carts).is_empty());
	assert!(db.batches(&copy).is_empty());
	assert!(db.events_of(SinkEventKind::Write).is_empty());
	assert_eq!(coordinator.views()[0].status(), ViewStatus::Init);
	assert_eq!(coordinator.views()[0].context().activations(), 0);
}

#[test]
fn test_direct_sink_failure_skips_views() {
	let db = shop();
	let orders = table_id("orders");
	let copy = create_materialized_view(&db, "orders_mv", "SELECT *", &orders, "orders_copy", orders_schema());
	db.fail_on(&orders, FailPoint::Write);

	let mut coordinator = coordinator(&db, settings());
	let err = coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap_err();

	assert_eq!(err.code, "INTERNAL_ERROR");
	assert!(db.batches(&copy).is_empty());
	assert_eq!(coordinator.views()[0].status(), ViewStatus::Init);
}

#[test]
fn test_prefix_failure_is_raised_immediately() {
	let db = shop();
	let orders = table_id("orders");
	let first = create_materialized_view(&db, "first_mv", "SELECT *", &orders, "first", orders_schema());
	create_live_view(&db, "second_live", &orders);
	db.fail_on(&first, FailPoint::Prefix);

	let mut coordinator = coordinator(&db, settings());
	let err = coordinator.write_prefix().unwrap_err();

	assert_eq!(err.code, "VIEW_001");
	assert!(err.message.contains("while writing prefix to view shop.first_mv"), "{}", err.message);
	assert_eq!(coordinator.views()[1].status(), ViewStatus::Init);
	assert_eq!(db.stats(&orders).prefixes, 1);
}

#[test]
fn test_suffix_failure_is_logged_and_raised() {
	let db = shop();
	let orders = table_id("orders");
	let first = create_materialized_view(&db, "first_mv", "SELECT *", &orders, "first", orders_schema());
	create_live_view(&db, "second_live", &orders);
	db.fail_on(&first, FailPoint::Suffix);

	let mut coordinator = coordinator(&db, settings());
	coordinator.write_prefix().unwrap();
	coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap();
	let err = coordinator.write_suffix().unwrap_err();

	assert_eq!(err.code, "VIEW_001");
	assert!(err.message.contains("while writing suffix to view shop.first_mv"), "{}", err.message);
	assert_eq!(coordinator.views()[0].status(), ViewStatus::WrittenBlock);

	let entries = db.view_log().entries();
	assert_eq!(entries.len(), 2);
	assert_eq!(entries[0].view_name, "shop.first");
	assert_eq!(entries[0].exception_code.as_deref(), Some("VIEW_001"));
	assert_eq!(entries[1].exception_code, None);
}

#[test]
fn test_query_failure_is_tagged_with_view() {
	let db = shop();
	let orders = table_id("orders");
	create_materialized_view(&db, "broken_mv", "SELECT * WHERE discount > 1", &orders, "broken", orders_schema());

	let mut coordinator = coordinator(&db, settings());
	let err = coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap_err();

	assert_eq!(err.code, "VIEW_001");
	assert_eq!(err.root_cause().code, "SCHEMA_002");
	assert!(err.to_string().contains("discount"), "{err}");
}

#[test]
fn test_failure_stays_the_first_one_recorded() {
	let db = shop();
	let orders = table_id("orders");
	let copy = create_materialized_view(&db, "orders_mv", "SELECT *", &orders, "orders_copy", orders_schema());
	db.fail_on(&copy, FailPoint::Write);
	db.fail_on(&copy, FailPoint::Suffix);

	let mut coordinator = coordinator(&db, settings());
	let first = coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap_err();
	let second = coordinator.write_suffix().unwrap_err();

	assert_eq!(first, second);
	assert!(second.message.contains("while pushing to view"), "{}", second.message);
}

#[test]
fn test_ambient_context_restored_after_every_call() {
	let db = shop();
	let orders = table_id("orders");
	let copy = create_materialized_view(&db, "orders_mv", "SELECT *", &orders, "orders_copy", orders_schema());
	create_live_view(&db, "orders_live", &orders);

	let query = ExecutionContext::new("test-query", "insert");
	let _guard = query.enter();
	let before = ExecutionContext::current_ptr();
	assert_eq!(before, Some(Arc::as_ptr(&query)));

	let mut coordinator = coordinator(&db, settings());
	coordinator.write_prefix().unwrap();
	assert_eq!(ExecutionContext::current_ptr(), before);
	coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap();
	assert_eq!(ExecutionContext::current_ptr(), before);

	db.fail_on(&copy, FailPoint::Write);
	assert!(coordinator.write(&orders_batch(&[(2, "eu", 1.0)])).is_err());
	assert_eq!(ExecutionContext::current_ptr(), before);

	assert!(coordinator.write_suffix().is_err());
	assert_eq!(ExecutionContext::current_ptr(), before);
}

#[test]
fn test_ambient_context_restored_after_parallel_failure() {
	let db = shop();
	let orders = table_id("orders");
	let copy = create_materialized_view(&db, "orders_mv", "SELECT *", &orders, "orders_copy", orders_schema());
	create_live_view(&db, "orders_live", &orders);
	db.fail_on(&copy, FailPoint::Write);

	let query = ExecutionContext::new("test-query", "insert");
	let _guard = query.enter();
	let before = ExecutionContext::current_ptr();

	let mut coordinator = coordinator(&db, settings().parallel_view_processing(true));
	coordinator.write_prefix().unwrap();

	assert!(coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).is_err());
	assert_eq!(ExecutionContext::current_ptr(), before);

	assert!(coordinator.write_suffix().is_err());
	assert_eq!(ExecutionContext::current_ptr(), before);
}

/// Produces one row whose `n.a` and `n.b` arrays disagree in length,
/// whatever the query and the inserted batch are.
struct RaggedEvaluator;

fn ragged_schema() -> Schema {
	Schema::new(vec![
		ColumnDef::new("n.a", Type::Array(Box::new(Type::Int8))),
		ColumnDef::new("n.b", Type::Array(Box::new(Type::Int8))),
	])
}

impl TransformEvaluator for RaggedEvaluator {
	fn output_schema(&self, _query: &ViewQuery, _source: &Schema, _scope: &ExecutionScope) -> Result<Schema> {
		Ok(ragged_schema())
	}

	fn evaluate(&self, _query: &ViewQuery, _source: ViewSource, _scope: &ExecutionScope) -> Result<BatchStream> {
		let batch = Batch::new(vec![
			Column::array("n.a", Type::Int8, vec![vec![Value::Int8(1)]]),
			Column::array("n.b", Type::Int8, vec![vec![]]),
		])?;
		Ok(Box::new(iter::once(Ok(batch))))
	}
}

#[test]
fn test_malformed_view_output_is_not_written() {
	let db = shop();
	let orders = table_id("orders");
	let target = create_materialized_view(&db, "ragged_mv", "SELECT *", &orders, "ragged", ragged_schema());

	let mut services = db.services();
	services.evaluator = Arc::new(RaggedEvaluator);
	let scope = ExecutionScope::new(services, settings(), "test-query");
	let mut coordinator = FanOutCoordinator::new(&scope, InsertTarget::new(db.table(&orders).unwrap())).unwrap();

	let err = coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap_err();

	assert_eq!(err.code, "VIEW_001");
	assert_eq!(err.label.as_deref(), Some("shop.ragged_mv"));
	assert_eq!(err.root_cause().code, "BATCH_001");
	assert!(db.batches(&target).is_empty());
	// the inserted batch itself was fine
	assert_eq!(db.batches(&orders).len(), 1);
}

#[test]
fn test_live_view_failure_is_tagged() {
	let db = shop();
	let orders = table_id("orders");
	let live = create_live_view(&db, "orders_live", &orders);
	db.fail_on(&live, FailPoint::Write);

	let mut coordinator = coordinator(&db, settings());
	let err = coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap_err();

	assert_eq!(err.code, "VIEW_001");
	assert_eq!(err.label.as_deref(), Some("shop.orders_live"));
}

#[test]
fn test_catalog_lookup_of_missing_table() {
	let db = shop();
	let err = db.table(&table_id("missing")).unwrap_err();
	assert_eq!(err.code, "TABLE_001");
}
