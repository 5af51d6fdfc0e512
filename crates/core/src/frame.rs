// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Code units and their activations.
//!
//! A [`Code`] is the static descriptor of one traced function; its identity is
//! its address, so two functions with the same name in different modules never
//! match. A [`Frame`] is one activation of a code unit. It owns the binding
//! table of that activation and reports its lifecycle to the execution hook.

use std::{fmt, thread};

use indexmap::IndexMap;

use crate::{
	hook,
	hook::{Event, EventKind},
	value::Value,
};

/// Static descriptor of a traced function. Lives in a `static` item emitted
/// into the function's body.
pub struct Code {
	name: &'static str,
	module: &'static str,
	file: &'static str,
	line: u32,
}

impl Code {
	pub const fn new(name: &'static str, module: &'static str, file: &'static str, line: u32) -> Self {
		Self {
			name,
			module,
			file,
			line,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn module(&self) -> &'static str {
		self.module
	}

	pub fn file(&self) -> &'static str {
		self.file
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	pub fn id(&'static self) -> CodeId {
		CodeId(self as *const Code as usize)
	}
}

impl fmt::Debug for Code {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{} ({}:{})", self.module, self.name, self.file, self.line)
	}
}

/// Identity of a [`Code`], derived from its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeId(usize);

/// Binding table of one activation. Rebinding a name replaces its value but
/// keeps the position of its first binding.
///
/// An entry holds the value recorded last, at a binding or an assignment. While
/// an inner block shadows a name, the entry follows the inner binding; leaving
/// the block restores the entry saved by [`Locals::shadow`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Locals {
	bindings: IndexMap<&'static str, Value>,
	shadowed: Vec<(&'static str, Option<Value>)>,
}

impl Locals {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bind(&mut self, name: &'static str, value: Value) {
		self.bindings.insert(name, value);
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.bindings.get(name)
	}

	/// Save the entry of `name` before an inner binding hides it.
	pub fn shadow(&mut self, name: &'static str) {
		self.shadowed.push((name, self.bindings.get(name).cloned()));
	}

	/// Restore the entry saved by the matching [`Locals::shadow`]. A name that
	/// had no entry loses the one the inner binding created.
	pub fn unshadow(&mut self, name: &'static str) {
		let Some(idx) = self.shadowed.iter().rposition(|(shadowed, _)| *shadowed == name) else {
			return;
		};
		match self.shadowed.remove(idx).1 {
			Some(value) => {
				self.bindings.insert(name, value);
			}
			None => {
				self.bindings.shift_remove(name);
			}
		}
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
		self.bindings.iter().map(|(name, value)| (*name, value))
	}
}

impl IntoIterator for Locals {
	type Item = (&'static str, Value);
	type IntoIter = indexmap::map::IntoIter<&'static str, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.bindings.into_iter()
	}
}

/// One activation of a traced function.
///
/// Entering a frame raises the thread's frame depth and emits
/// [`EventKind::Call`]; dropping it emits [`EventKind::Return`], or
/// [`EventKind::Unwind`] when the frame is torn down by a panic, then lowers the
/// depth again. Bindings are only evaluated while an observer was installed at
/// entry, so unobserved frames never pay for serialization.
pub struct Frame {
	code: &'static Code,
	depth: usize,
	locals: Locals,
	observed: bool,
	panicking_at_entry: bool,
}

impl Frame {
	pub fn enter(code: &'static Code) -> Self {
		let depth = hook::push_frame();
		let observed = hook::is_installed();

		let frame = Self {
			code,
			depth,
			locals: Locals::new(),
			observed,
			panicking_at_entry: thread::panicking(),
		};

		if observed {
			hook::notify(&Event {
				kind: EventKind::Call,
				code,
				depth,
				locals: &frame.locals,
			});
		}

		frame
	}

	pub fn bind(&mut self, name: &'static str, capture: impl FnOnce() -> Value) {
		if self.observed {
			self.locals.bind(name, capture());
		}
	}

	pub fn shadow(&mut self, name: &'static str) {
		if self.observed {
			self.locals.shadow(name);
		}
	}

	pub fn unshadow(&mut self, name: &'static str) {
		if self.observed {
			self.locals.unshadow(name);
		}
	}

	pub fn code(&self) -> &'static Code {
		self.code
	}

	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn locals(&self) -> &Locals {
		&self.locals
	}

	pub fn is_observed(&self) -> bool {
		self.observed
	}
}

impl Drop for Frame {
	fn drop(&mut self) {
		if self.observed {
			// a frame dropped normally inside another panic's cleanup still returned
			let kind = if thread::panicking() && !self.panicking_at_entry {
				EventKind::Unwind
			} else {
				EventKind::Return
			};

			hook::notify(&Event {
				kind,
				code: self.code,
				depth: self.depth,
				locals: &self.locals,
			});
		}

		hook::pop_frame();
	}
}
