// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Core of introspect: wrappers that forward calls to a target callable and,
//! after every invocation, publish a snapshot of the variables the target
//! bound while it ran.
//!
//! Two engines produce the same external contract:
//!
//! - [`Instrumented`]: the target's body was rewritten at build time (see the
//!   `#[instrument]` macro) and publishes its own bindings through a scope guard.
//! - [`Traced`]: the target is left alone; a transient observer is installed in
//!   the thread's execution [`hook`] for the duration of one call and copies the
//!   binding table of the target's own [`Frame`] when it exits.
//!
//! This crate has no macros. It is used through the `introspect` package, which
//! re-exports it together with the code generators.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod args;
pub mod callable;
mod capture;
pub mod engine;
pub mod error;
pub mod frame;
pub mod hook;
pub mod snapshot;
pub mod store;
pub mod value;
pub mod wrapper;

pub use args::Args;
pub use callable::Callable;
pub use engine::{
	Engine, EngineKind, Target,
	instrumented::{Instrumented, Scope, Sink},
	traced::Traced,
};
pub use error::{Error, Result};
pub use frame::{Code, CodeId, Frame, Locals};
pub use hook::{Event, EventKind, HookGuard, Observer};
pub use snapshot::Snapshot;
pub use store::Store;
pub use value::Value;
pub use wrapper::{Wrapper, trace, wrap};

/// Support items referenced by generated code. Not part of the public API.
#[doc(hidden)]
pub mod __private {
	pub use crate::{
		capture::{DebugProbe, OpaqueProbe, Probe, SerializeProbe},
		engine::instrumented::{Scope, Sink},
		frame::{Code, Frame},
		value::Value,
	};
}
