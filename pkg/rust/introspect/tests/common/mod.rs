// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code, unused_imports)]

use introspect::{Snapshot, instrument, traced};
pub use introspect_testing::{Counter, Recording, init_tracing};
use serde_json::json;

#[instrument(name = "compare")]
pub fn compare_instrumented(a: i64, b: i64, c: i64) -> bool {
	let total = a + b + c;
	let product = a * b * c;
	total < product
}

#[traced]
pub fn compare(a: i64, b: i64, c: i64) -> bool {
	let total = a + b + c;
	let product = a * b * c;
	total < product
}

/// Snapshot of either `compare` called with `(2, 1, 2)`.
pub fn scenario() -> serde_json::Value {
	json!({"a": 2, "b": 1, "c": 2, "total": 5, "product": 4})
}

pub fn names(snapshot: &Snapshot) -> Vec<&str> {
	snapshot.names().collect()
}
