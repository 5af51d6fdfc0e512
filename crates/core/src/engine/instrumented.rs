// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Static instrumentation engine.
//!
//! `#[instrument]` and `instrumented!` turn a function or closure into an
//! [`Instrumented`] body: the original parameter list packed into a tuple,
//! preceded by a hidden [`Sink`]. The rewritten body opens the sink into a
//! [`Scope`] before anything else runs and records every binding it makes into
//! that scope. Dropping the scope publishes the binding table, so the snapshot
//! is written on every exit path: the tail value, `return`, `?` and panics.

use std::{fmt, mem, sync::Arc};

use tracing::trace;

use crate::{
	engine::{Engine, EngineKind, Target},
	frame::Locals,
	snapshot::Snapshot,
	store::Store,
	value::Value,
};

/// Where an instrumented body publishes its bindings.
///
/// A detached sink discards them without evaluating any capture.
pub struct Sink {
	name: &'static str,
	store: Option<Arc<Store>>,
}

impl Sink {
	pub(crate) fn attached(name: &'static str, store: Arc<Store>) -> Self {
		Self {
			name,
			store: Some(store),
		}
	}

	pub fn detached() -> Self {
		Self {
			name: "",
			store: None,
		}
	}

	pub fn is_attached(&self) -> bool {
		self.store.is_some()
	}

	/// Open the scope guarding the body.
	pub fn open(self) -> Scope {
		Scope {
			name: self.name,
			store: self.store,
			locals: Locals::new(),
		}
	}
}

impl fmt::Debug for Sink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Sink").field("name", &self.name).field("attached", &self.is_attached()).finish()
	}
}

/// The binding table of one instrumented invocation. Publishes on drop.
pub struct Scope {
	name: &'static str,
	store: Option<Arc<Store>>,
	locals: Locals,
}

impl Scope {
	pub fn bind(&mut self, name: &'static str, capture: impl FnOnce() -> Value) {
		if self.store.is_some() {
			self.locals.bind(name, capture());
		}
	}

	pub fn shadow(&mut self, name: &'static str) {
		if self.store.is_some() {
			self.locals.shadow(name);
		}
	}

	pub fn unshadow(&mut self, name: &'static str) {
		if self.store.is_some() {
			self.locals.unshadow(name);
		}
	}

	pub fn locals(&self) -> &Locals {
		&self.locals
	}
}

impl Drop for Scope {
	fn drop(&mut self) {
		if let Some(store) = self.store.take() {
			let locals = mem::take(&mut self.locals);
			trace!(callable = self.name, bindings = locals.len(), "publishing instrumented snapshot");
			store.publish(Snapshot::from(locals));
		}
	}
}

/// A body produced by the static instrumentation engine.
///
/// `F` is `fn(Sink, (P1, .., Pn)) -> R` for instrumented functions and a closure
/// type for instrumented closures.
#[derive(Clone, Copy)]
pub struct Instrumented<F> {
	name: &'static str,
	body: F,
}

impl<F> Instrumented<F> {
	pub const fn new(name: &'static str, body: F) -> Self {
		Self {
			name,
			body,
		}
	}

	/// Call the body directly, without capturing anything.
	pub fn call<A, R>(&self, args: A) -> R
	where
		F: Fn(Sink, A) -> R,
	{
		(self.body)(Sink::detached(), args)
	}
}

impl<F> fmt::Debug for Instrumented<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Instrumented").field("name", &self.name).finish_non_exhaustive()
	}
}

impl<F> Target for Instrumented<F> {
	fn name(&self) -> &str {
		self.name
	}

	fn kind(&self) -> EngineKind {
		EngineKind::Static
	}
}

impl<F, A, R> Engine<A> for Instrumented<F>
where
	F: Fn(Sink, A) -> R,
{
	type Output = R;

	fn invoke(&self, store: &Arc<Store>, args: A) -> R {
		(self.body)(Sink::attached(self.name, Arc::clone(store)), args)
	}
}

#[cfg(test)]
pub mod tests {
	use std::{panic, sync::Arc};

	use serde_json::json;

	use super::{Instrumented, Sink};
	use crate::{
		engine::{Engine, EngineKind, Target},
		store::Store,
		value::Value,
	};

	// what `#[instrument]` emits for:
	// fn compare(a: i64, b: i64, c: i64) -> bool {
	//     let total = a + b + c;
	//     let product = a * b * c;
	//     total < product
	// }
	#[allow(non_upper_case_globals)]
	const compare: Instrumented<fn(Sink, (i64, i64, i64)) -> bool> = {
		let body: fn(Sink, (i64, i64, i64)) -> bool = |sink, (a, b, c)| {
			let mut scope = sink.open();
			scope.bind("a", || Value::of(&a));
			scope.bind("b", || Value::of(&b));
			scope.bind("c", || Value::of(&c));
			let total = a + b + c;
			scope.bind("total", || Value::of(&total));
			let product = a * b * c;
			scope.bind("product", || Value::of(&product));
			total < product
		};
		Instrumented::new("compare", body)
	};

	#[allow(non_upper_case_globals)]
	const checked_div: Instrumented<fn(Sink, (i64, i64)) -> i64> = {
		let body: fn(Sink, (i64, i64)) -> i64 = |sink, (n, d)| {
			let mut scope = sink.open();
			scope.bind("n", || Value::of(&n));
			scope.bind("d", || Value::of(&d));
			let half = n / 2;
			scope.bind("half", || Value::of(&half));
			if d == 0 {
				panic!("division by zero");
			}
			let quotient = n / d;
			scope.bind("quotient", || Value::of(&quotient));
			quotient
		};
		Instrumented::new("checked_div", body)
	};

	#[test]
	fn test_invoke_publishes() {
		let store = Arc::new(Store::new());
		assert!(!compare.invoke(&store, (2, 1, 2)));

		assert_eq!(store.snapshot().to_json(), json!({"a": 2, "b": 1, "c": 2, "total": 5, "product": 4}));
		assert_eq!(compare.kind(), EngineKind::Static);
		assert_eq!(compare.name(), "compare");
	}

	#[test]
	fn test_direct_call_does_not_capture() {
		assert!(!compare.call((1, 2, 3)));
		assert!(compare.call((2, 2, 2)));
	}

	#[test]
	fn test_panic_publishes_bindings_before_panic() {
		let store = Arc::new(Store::new());
		checked_div.invoke(&store, (10, 5));

		let result = panic::catch_unwind(panic::AssertUnwindSafe(|| checked_div.invoke(&store, (7, 0))));

		assert!(result.is_err());
		assert_eq!(store.snapshot().to_json(), json!({"n": 7, "d": 0, "half": 3}));
	}

	#[test]
	fn test_detached_scope_skips_capture() {
		let mut scope = Sink::detached().open();
		scope.bind("x", || panic!("capture must not run for a detached sink"));
		assert!(scope.locals().is_empty());
	}
}
