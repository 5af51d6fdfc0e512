// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{
	engine::{Engine, EngineKind, Target, instrumented::Instrumented, traced::Traced},
	error::{Error, Result},
	snapshot::Snapshot,
	store::Store,
};

/// A callable that publishes a snapshot of its target's bindings after every
/// invocation.
///
/// The target is owned by the wrapper from construction on; nothing is looked
/// up by name afterwards. Clones share the target and the snapshot slot, so a
/// clone behaves as another handle to the same wrapper: moving, storing or
/// dropping handles never affects capture through the ones that remain.
///
/// The slot holds the snapshot of the most recent completed invocation only.
/// Concurrent or recursive invocations through the same wrapper race on it and
/// the last one to complete wins.
pub struct Wrapper<T> {
	target: Arc<T>,
	store: Arc<Store>,
}

impl<T: Target> Wrapper<T> {
	pub fn new(target: T) -> Self {
		debug!(callable = target.name(), engine = %target.kind(), "wrapper created");
		Self {
			target: Arc::new(target),
			store: Arc::new(Store::new()),
		}
	}

	pub fn name(&self) -> &str {
		self.target.name()
	}

	pub fn engine(&self) -> EngineKind {
		self.target.kind()
	}
}

impl<F> Wrapper<Instrumented<F>> {
	/// Wrap a body produced by `#[instrument]` or `instrumented!`.
	pub fn instrumented(body: Instrumented<F>) -> Self {
		Self::new(body)
	}
}

impl<F> Wrapper<Traced<F>> {
	/// Wrap any callable under the dynamic tracing engine.
	pub fn traced(target: F) -> Self {
		Self::new(Traced::new(target))
	}

	pub fn traced_named(name: &'static str, target: F) -> Self {
		Self::new(Traced::named(name, target))
	}
}

impl<T> Wrapper<T> {
	/// Call the target with exactly `args` and return exactly what it returns.
	///
	/// A panic raised by the target propagates unchanged, after the snapshot of
	/// the bindings made before the panic has been published.
	pub fn call<A>(&self, args: A) -> T::Output
	where
		T: Engine<A>,
	{
		self.target.invoke(&self.store, args)
	}

	/// Like [`Wrapper::call`], but fails when no snapshot guarantee holds for
	/// the call. For the tracing engine that is an observer conflict, detected
	/// before the target runs, or a target that entered no traced frame,
	/// detected after it ran; in the latter case the target's output is
	/// discarded.
	pub fn try_call<A>(&self, args: A) -> Result<T::Output>
	where
		T: Engine<A>,
	{
		self.target.try_invoke(&self.store, args)
	}

	/// The snapshot of the most recent invocation; empty before the first one.
	pub fn locals(&self) -> Arc<Snapshot> {
		self.store.snapshot()
	}

	/// Why the most recent invocation was not captured, if it was not.
	pub fn capture_error(&self) -> Option<Error> {
		self.store.error()
	}

	pub fn target(&self) -> &T {
		&self.target
	}
}

impl<T> Clone for Wrapper<T> {
	fn clone(&self) -> Self {
		Self {
			target: Arc::clone(&self.target),
			store: Arc::clone(&self.store),
		}
	}
}

impl<T: Target> fmt::Debug for Wrapper<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Wrapper")
			.field("name", &self.name())
			.field("engine", &self.engine())
			.field("locals", &self.locals())
			.finish()
	}
}

/// Wrap an instrumented body under the static engine.
pub fn wrap<F>(body: Instrumented<F>) -> Wrapper<Instrumented<F>> {
	Wrapper::instrumented(body)
}

/// Wrap any callable under the dynamic tracing engine.
pub fn trace<F>(target: F) -> Wrapper<Traced<F>> {
	Wrapper::traced(target)
}
