// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{Arc, Barrier},
	thread,
};

use cascade_core::{ExecutionContext, interface::ViewStatus};
use cascade_testing::{FailPoint, SinkEventKind};

use crate::{coordinator, create_copy, create_live_view, create_materialized_view, orders_batch, orders_schema, settings, shop, table_id};

#[test]
fn test_parallel_failure_waits_for_every_dispatched_view() {
	let db = shop();
	let orders = table_id("orders");
	let failing = create_materialized_view(&db, "a_mv", "SELECT *", &orders, "a", orders_schema());
	let live = create_live_view(&db, "b_live", &orders);
	db.fail_on(&failing, FailPoint::Write);

	// Neither view gets past its write until both have started
	let barrier = Arc::new(Barrier::new(2));
	db.gate_writes(&failing, barrier.clone());
	db.gate_writes(&live, barrier);

	let mut coordinator = coordinator(&db, settings().parallel_view_processing(true));
	let err = coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap_err();

	assert_eq!(err.code, "VIEW_001");
	assert!(err.message.contains("shop.a_mv"), "{}", err.message);

	let views = coordinator.views();
	assert!(views[0].is_failed());
	assert!(!views[1].is_failed());
	assert_eq!(views[1].status(), ViewStatus::WrittenBlock);
	assert_eq!(db.received(&live).len(), 1);
}

#[test]
fn test_parallel_write_reaches_every_view() {
	let db = shop();
	let orders = table_id("orders");
	let targets: Vec<_> = (0..4)
		.map(|index| {
			create_materialized_view(
				&db,
				&format!("mv_{index}"),
				"SELECT *",
				&orders,
				&format!("target_{index}"),
				orders_schema(),
			)
		})
		.collect();

	let query = ExecutionContext::new("test-query", "insert");
	let _guard = query.enter();
	let before = ExecutionContext::current_ptr();

	let mut coordinator = coordinator(&db, settings().parallel_view_processing(true));
	coordinator.write_prefix().unwrap();
	coordinator.write(&orders_batch(&[(1, "eu", 1.0), (2, "us", 2.0)])).unwrap();
	coordinator.write_suffix().unwrap();

	assert_eq!(ExecutionContext::current_ptr(), before);
	for (view, target) in coordinator.views().iter().zip(&targets) {
		assert_eq!(view.status(), ViewStatus::WrittenSuffix);
		assert_eq!(view.context().rows_written(), 2);
		assert_eq!(db.batches(target).len(), 1);
	}

	// every view write ran with the view's own context installed
	for event in db.events_of(SinkEventKind::Write) {
		if event.table == orders {
			assert_eq!(event.context.as_deref(), Some("insert"));
		} else {
			assert_eq!(event.context, Some(event.table.to_string()));
		}
	}
}

#[test]
fn test_write_from_thread_without_context() {
	let db = shop();
	let orders = table_id("orders");
	create_copy(&db, "first", &orders);
	create_copy(&db, "second", &orders);

	let mut coordinator = coordinator(&db, settings().parallel_view_processing(true));
	thread::scope(|scope| {
		scope
			.spawn(|| {
				coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).unwrap();
				assert!(ExecutionContext::current().is_none());
			})
			.join()
			.unwrap();
	});

	assert!(coordinator.views().iter().all(|view| view.status() == ViewStatus::WrittenBlock));
}

#[test]
fn test_single_thread_falls_back_to_serial() {
	let db = shop();
	let orders = table_id("orders");
	let failing = create_materialized_view(&db, "a_mv", "SELECT *", &orders, "a", orders_schema());
	let live = create_live_view(&db, "b_live", &orders);
	db.fail_on(&failing, FailPoint::Write);

	let mut coordinator = coordinator(&db, settings().parallel_view_processing(true).max_threads(1));
	assert!(coordinator.write(&orders_batch(&[(1, "eu", 1.0)])).is_err());

	assert_eq!(coordinator.views()[1].status(), ViewStatus::Init);
	assert!(db.received(&live).is_empty());
}
