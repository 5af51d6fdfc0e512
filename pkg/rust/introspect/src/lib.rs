// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Wrap a callable and read back the variables it bound during its most
//! recent invocation.
//!
//! ```ignore
//! use introspect::{instrument, wrap};
//!
//! #[instrument]
//! fn compare(a: i64, b: i64, c: i64) -> bool {
//!     let total = a + b + c;
//!     let product = a * b * c;
//!     total < product
//! }
//!
//! let wrapper = wrap(compare);
//! assert!(!wrapper.call((2, 1, 2)));
//! assert_eq!(wrapper.locals().to_string(), "{a: 2, b: 1, c: 2, total: 5, product: 4}");
//! ```
//!
//! Two engines produce the same snapshot:
//!
//! - [`macro@instrument`] rewrites the function body at build time; wrap it with
//!   [`wrap`].
//! - [`macro@traced`] makes a function report its frame to the thread's
//!   execution [`hook`]; wrap any callable that enters it with [`trace`].
//!
//! See [`EngineKind`] for the trade-offs between the two.

pub use introspect_core::{
	Args, Callable, Code, CodeId, Engine, EngineKind, Error, Event, EventKind, Frame, HookGuard, Instrumented,
	Locals, Observer, Result, Scope, Sink, Snapshot, Store, Target, Traced, Value, Wrapper, hook, trace, wrap,
};
pub use introspect_macro::{instrument, instrumented, traced};

#[doc(hidden)]
pub use introspect_core::__private;
