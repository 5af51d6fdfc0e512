// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Dynamic tracing engine.
//!
//! The target is called as is. Immediately before the call a [`CaptureObserver`]
//! is installed in the thread's execution hook; a [`TraceSession`] guard
//! uninstalls it exactly once after the call, whether the call returned or
//! panicked, and publishes what the observer captured.
//!
//! The observer sees every traced frame entered during the call. It binds the
//! target's code unit to the first frame entered directly below the depth it
//! was installed at, then copies the binding table of every frame of that code
//! unit as it returns or unwinds. Frames of other code units pass through. When
//! the target recurses, each inner activation overwrites the capture and the
//! outermost one, returning last, is what gets published.

use std::{any::type_name, cell::RefCell, fmt, rc::Rc, sync::Arc};

use tracing::{debug, trace, warn};

use crate::{
	callable::Callable,
	engine::{Engine, EngineKind, Target},
	error::{Error, Result},
	frame::{CodeId, Locals},
	hook,
	hook::{Event, EventKind, HookGuard, Observer},
	snapshot::Snapshot,
	store::Store,
};

/// A callable run under the dynamic tracing engine.
///
/// The callable must enter a `#[traced]` function. The first one it enters
/// fixes the captured code unit, and the wrapper publishes the bindings of the
/// last activation of that unit to return: a closure calling the same traced
/// function twice publishes the second call.
#[derive(Clone)]
pub struct Traced<F> {
	name: &'static str,
	target: F,
}

impl<F> Traced<F> {
	pub fn new(target: F) -> Self {
		Self {
			name: type_name::<F>(),
			target,
		}
	}

	pub fn named(name: &'static str, target: F) -> Self {
		Self {
			name,
			target,
		}
	}

	pub fn get_ref(&self) -> &F {
		&self.target
	}
}

impl<F> fmt::Debug for Traced<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Traced").field("name", &self.name).finish_non_exhaustive()
	}
}

impl<F> Target for Traced<F> {
	fn name(&self) -> &str {
		self.name
	}

	fn kind(&self) -> EngineKind {
		EngineKind::Tracing
	}
}

impl<F, A> Engine<A> for Traced<F>
where
	F: Callable<A>,
{
	type Output = F::Output;

	fn invoke(&self, store: &Arc<Store>, args: A) -> F::Output {
		match TraceSession::begin(self.name, store) {
			Ok(session) => {
				let output = self.target.call(args);
				// an untraced call is already recorded in the store
				let _ = session.finish();
				output
			}
			Err(error) => {
				warn!(callable = self.name, %error, "running without capture");
				store.fail(error);
				self.target.call(args)
			}
		}
	}

	fn try_invoke(&self, store: &Arc<Store>, args: A) -> Result<F::Output> {
		let session = TraceSession::begin(self.name, store)?;
		let output = self.target.call(args);
		session.finish()?;
		Ok(output)
	}
}

#[derive(Debug, Default)]
struct Capture {
	code: Option<CodeId>,
	locals: Option<Locals>,
}

struct CaptureObserver {
	base: usize,
	capture: Rc<RefCell<Capture>>,
}

impl Observer for CaptureObserver {
	fn notify(&mut self, event: &Event<'_>) {
		let mut capture = self.capture.borrow_mut();
		match event.kind {
			EventKind::Call => {
				if capture.code.is_none() && event.depth == self.base + 1 {
					capture.code = Some(event.code.id());
				}
			}
			EventKind::Return | EventKind::Unwind => {
				if capture.code == Some(event.code.id()) {
					capture.locals = Some(event.locals.clone());
				}
			}
		}
	}
}

/// One traced invocation. Owns the installed observer.
struct TraceSession<'a> {
	name: &'static str,
	store: &'a Arc<Store>,
	capture: Rc<RefCell<Capture>>,
	guard: Option<HookGuard>,
}

impl<'a> TraceSession<'a> {
	fn begin(name: &'static str, store: &'a Arc<Store>) -> Result<Self> {
		let capture = Rc::new(RefCell::new(Capture::default()));
		let observer = CaptureObserver {
			base: hook::depth(),
			capture: Rc::clone(&capture),
		};

		let guard = hook::install(observer).map_err(|_| Error::ObserverConflict {
			target: name.to_string(),
		})?;
		debug!(callable = name, "trace session started");

		Ok(Self {
			name,
			store,
			capture,
			guard: Some(guard),
		})
	}

	fn finish(mut self) -> Result<()> {
		self.close()
	}

	fn close(&mut self) -> Result<()> {
		let Some(guard) = self.guard.take() else {
			return Ok(());
		};
		drop(guard);

		let captured = self.capture.borrow_mut().locals.take();
		match captured {
			Some(locals) => {
				trace!(callable = self.name, bindings = locals.len(), "publishing traced snapshot");
				self.store.publish(Snapshot::from(locals));
				Ok(())
			}
			None => {
				let error = Error::Untraced {
					target: self.name.to_string(),
				};
				warn!(callable = self.name, %error, "no snapshot captured");
				self.store.fail(error.clone());
				Err(error)
			}
		}
	}
}

impl Drop for TraceSession<'_> {
	fn drop(&mut self) {
		let _ = self.close();
	}
}
