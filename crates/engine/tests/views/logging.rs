// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use cascade_core::interface::{ViewLog, ViewStatus, ViewType};
use cascade_engine::{TracingViewLog, execute_insert};
use cascade_testing::FailPoint;

use crate::{create_copy, create_live_view, create_materialized_view, orders_batch, orders_schema, settings, shop, table_id};

#[test]
fn test_views_are_logged_after_suffix() {
	let db = shop();
	let orders = table_id("orders");
	create_materialized_view(&db, "orders_mv", "SELECT * WHERE amount > 1", &orders, "orders_copy", orders_schema());
	create_live_view(&db, "orders_live", &orders);
	create_copy(&db, "orders_archive", &orders);

	execute_insert(&db.scope(settings()), &orders, [orders_batch(&[(1, "eu", 1.0), (2, "eu", 2.0)])]).unwrap();

	let entries = db.view_log().entries();
	assert_eq!(entries.len(), 3);

	assert_eq!(entries[0].view_name, "shop.orders_copy");
	assert_eq!(entries[0].view_type, ViewType::Materialized);
	assert_eq!(entries[0].view_query.as_deref(), Some("SELECT * WHERE amount > 1"));
	assert_eq!(entries[0].written_rows, 1);

	assert_eq!(entries[1].view_name, "shop.orders_live");
	assert_eq!(entries[1].view_type, ViewType::Live);
	assert_eq!(entries[1].written_rows, 2);

	assert_eq!(entries[2].view_name, "shop.orders_archive");
	assert_eq!(entries[2].view_type, ViewType::Default);
	assert_eq!(entries[2].view_query, None);

	assert!(entries.iter().all(|entry| entry.status == ViewStatus::WrittenSuffix));
	assert!(entries.iter().all(|entry| entry.query_id == "test-query"));
	assert!(entries.iter().all(|entry| entry.exception.is_none()));
}

#[test]
fn test_view_logging_disabled() {
	let db = shop();
	let orders = table_id("orders");
	create_live_view(&db, "orders_live", &orders);

	execute_insert(&db.scope(settings().log_query_views(false)), &orders, [orders_batch(&[(1, "eu", 1.0)])])
		.unwrap();

	assert!(db.view_log().entries().is_empty());
}

#[test]
fn test_query_logging_disabled() {
	let db = shop();
	let orders = table_id("orders");
	create_live_view(&db, "orders_live", &orders);

	let mut settings = settings();
	settings.log_queries = false;
	execute_insert(&db.scope(settings), &orders, [orders_batch(&[(1, "eu", 1.0)])]).unwrap();

	assert!(db.view_log().entries().is_empty());
}

#[test]
fn test_fast_views_are_not_logged() {
	let db = shop();
	let orders = table_id("orders");
	let slow = create_materialized_view(&db, "slow_mv", "SELECT *", &orders, "slow", orders_schema());
	create_materialized_view(&db, "fast_mv", "SELECT *", &orders, "fast", orders_schema());
	db.delay_writes(&slow, Duration::from_millis(80));

	let settings = settings().log_queries_min_query_duration_ms(40);
	execute_insert(&db.scope(settings), &orders, [orders_batch(&[(1, "eu", 1.0)])]).unwrap();

	let entries = db.view_log().entries();
	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].view_name, "shop.slow");
	assert!(entries[0].elapsed_ms >= 80);
}

#[test]
fn test_view_log_failure_does_not_fail_insert() {
	let db = shop();
	let orders = table_id("orders");
	let copy = create_materialized_view(&db, "orders_mv", "SELECT *", &orders, "orders_copy", orders_schema());
	db.view_log().set_failing(true);

	execute_insert(&db.scope(settings()), &orders, [orders_batch(&[(1, "eu", 1.0)])]).unwrap();

	assert!(db.view_log().entries().is_empty());
	assert_eq!(db.batches(&copy).len(), 1);
}

#[test]
fn test_failed_view_is_logged_with_exception() {
	let db = shop();
	let orders = table_id("orders");
	let copy = create_materialized_view(&db, "orders_mv", "SELECT *", &orders, "orders_copy", orders_schema());
	db.fail_on(&copy, FailPoint::Write);

	let err = execute_insert(&db.scope(settings()), &orders, [orders_batch(&[(1, "eu", 1.0)])]).unwrap_err();

	let entries = db.view_log().entries();
	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].status, ViewStatus::WrittenPrefix);
	assert_eq!(entries[0].exception_code.as_deref(), Some("VIEW_001"));
	assert_eq!(entries[0].exception.as_deref(), Some(err.to_string().as_str()));
}

#[test]
fn test_tracing_view_log_accepts_entries() {
	let db = shop();
	let orders = table_id("orders");
	create_live_view(&db, "orders_live", &orders);
	execute_insert(&db.scope(settings()), &orders, [orders_batch(&[(1, "eu", 1.0)])]).unwrap();

	for entry in db.view_log().entries() {
		assert!(TracingViewLog.log_view(entry).is_ok());
	}
}
