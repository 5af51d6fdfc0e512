// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Capture engines.
//!
//! An engine target is what a [`Wrapper`](crate::Wrapper) owns and delegates to.
//! Both engines invoke the original code exactly once per call, return its
//! output untouched and leave the wrapper's store holding the snapshot of that
//! call before the output (or the panic) reaches the caller.

use std::{fmt, sync::Arc};

use crate::{error::Result, store::Store};

pub mod instrumented;
pub mod traced;

/// The construction-time choice between the two engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
	/// The body was rewritten at build time to publish its own bindings.
	///
	/// No observer is involved: the cost is one record per binding statement of
	/// the target, nested calls are not affected, and external observers using
	/// the execution hook keep working. Requires the target to be defined
	/// through `#[instrument]` or `instrumented!`.
	Static,
	/// A transient observer is installed in the thread's execution hook for the
	/// duration of the call.
	///
	/// The target itself is not rewritten for the wrapper, but every traced
	/// frame entered during the call notifies the observer, so the overhead grows
	/// with the total number of traced calls, not just the target's own work.
	/// The hook holds one observer per thread: the engine cannot capture while
	/// another observer (another traced wrapper, a profiler) is installed.
	Tracing,
}

impl fmt::Display for EngineKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EngineKind::Static => f.write_str("static"),
			EngineKind::Tracing => f.write_str("tracing"),
		}
	}
}

/// Properties of an engine target that do not depend on its arguments.
pub trait Target {
	fn name(&self) -> &str;

	fn kind(&self) -> EngineKind;
}

/// Invocation of an engine target with arguments `A`.
pub trait Engine<A>: Target {
	type Output;

	/// Invoke the target and publish its snapshot into `store`.
	///
	/// Never fails on its own behalf: a capture setup failure is recorded in the
	/// store and the target still runs.
	fn invoke(&self, store: &Arc<Store>, args: A) -> Self::Output;

	/// Like [`Engine::invoke`], but reports capture setup failures to the caller.
	fn try_invoke(&self, store: &Arc<Store>, args: A) -> Result<Self::Output> {
		Ok(self.invoke(store, args))
	}
}
