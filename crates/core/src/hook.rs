// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The execution hook: one observer slot per thread.
//!
//! Every traced [`Frame`](crate::Frame) running on a thread reports its call,
//! return and unwind events to the observer installed in that thread's slot.
//! The slot is an exclusive resource. [`install`] refuses to replace an
//! installed observer instead of silently multiplexing, and the returned
//! [`HookGuard`] uninstalls it again when dropped, on every exit path.
//!
//! The slot is not reentrant: while an observer is being notified, events
//! raised by frames it runs itself are dropped.

use std::{
	cell::{Cell, RefCell},
	fmt,
	marker::PhantomData,
};

use tracing::debug;

use crate::{
	error::{Error, Result},
	frame::{Code, Locals},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
	Call,
	Return,
	Unwind,
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EventKind::Call => f.write_str("call"),
			EventKind::Return => f.write_str("return"),
			EventKind::Unwind => f.write_str("unwind"),
		}
	}
}

/// A lifecycle notification of one frame.
#[derive(Debug)]
pub struct Event<'a> {
	pub kind: EventKind,
	pub code: &'static Code,
	pub depth: usize,
	pub locals: &'a Locals,
}

pub trait Observer {
	fn notify(&mut self, event: &Event<'_>);
}

impl<F> Observer for F
where
	F: FnMut(&Event<'_>),
{
	fn notify(&mut self, event: &Event<'_>) {
		self(event)
	}
}

thread_local! {
	static SLOT: RefCell<Option<Box<dyn Observer>>> = const { RefCell::new(None) };
	static INSTALLED: Cell<bool> = const { Cell::new(false) };
	static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Install `observer` for the current thread.
///
/// Fails with [`Error::Install`] when another observer is installed.
pub fn install(observer: impl Observer + 'static) -> Result<HookGuard> {
	if INSTALLED.get() {
		return Err(Error::Install);
	}

	SLOT.with_borrow_mut(|slot| *slot = Some(Box::new(observer)));
	INSTALLED.set(true);
	debug!(depth = DEPTH.get(), "execution observer installed");

	Ok(HookGuard {
		_thread: PhantomData,
	})
}

pub fn is_installed() -> bool {
	INSTALLED.get()
}

/// Number of traced frames currently active on this thread.
pub fn depth() -> usize {
	DEPTH.get()
}

pub(crate) fn push_frame() -> usize {
	let depth = DEPTH.get() + 1;
	DEPTH.set(depth);
	depth
}

pub(crate) fn pop_frame() {
	DEPTH.set(DEPTH.get().saturating_sub(1));
}

pub(crate) fn notify(event: &Event<'_>) {
	let Some(mut observer) = SLOT.with_borrow_mut(Option::take) else {
		return;
	};

	observer.notify(event);

	// the guard may have been dropped while the observer ran
	if INSTALLED.get() {
		SLOT.with_borrow_mut(|slot| *slot = Some(observer));
	}
}

/// Keeps an observer installed. Dropping the guard uninstalls it.
///
/// The guard is bound to the thread it was created on.
pub struct HookGuard {
	_thread: PhantomData<*const ()>,
}

impl fmt::Debug for HookGuard {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookGuard").finish_non_exhaustive()
	}
}

impl Drop for HookGuard {
	fn drop(&mut self) {
		SLOT.with_borrow_mut(|slot| *slot = None);
		INSTALLED.set(false);
		debug!(depth = DEPTH.get(), "execution observer uninstalled");
	}
}
