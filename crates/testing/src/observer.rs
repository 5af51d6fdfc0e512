// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Observers for the execution hook that remember what they saw.
//!
//! An observer is moved into the hook when installed, so each one comes with a
//! handle that stays with the test and reads what was observed.

use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};

use introspect_core::{Event, EventKind, Observer, Value};

/// An owned copy of one [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
	pub kind: EventKind,
	pub name: &'static str,
	pub depth: usize,
	pub bindings: Vec<(&'static str, Value)>,
}

impl Recorded {
	pub fn binding(&self, name: &str) -> Option<&Value> {
		self.bindings.iter().find(|(bound, _)| *bound == name).map(|(_, value)| value)
	}
}

/// Read side of a [`RecordingObserver`].
#[derive(Debug, Clone, Default)]
pub struct Recording {
	events: Rc<RefCell<Vec<Recorded>>>,
}

impl Recording {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn observer(&self) -> RecordingObserver {
		RecordingObserver {
			events: Rc::clone(&self.events),
		}
	}

	pub fn events(&self) -> Vec<Recorded> {
		self.events.borrow().clone()
	}

	/// `(kind, name)` of every event, for asserting on call order.
	pub fn trace(&self) -> Vec<(EventKind, &'static str)> {
		self.events.borrow().iter().map(|event| (event.kind, event.name)).collect()
	}

	pub fn len(&self) -> usize {
		self.events.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.borrow().is_empty()
	}
}

pub struct RecordingObserver {
	events: Rc<RefCell<Vec<Recorded>>>,
}

impl Observer for RecordingObserver {
	fn notify(&mut self, event: &Event<'_>) {
		self.events.borrow_mut().push(Recorded {
			kind: event.kind,
			name: event.code.name(),
			depth: event.depth,
			bindings: event.locals.iter().map(|(name, value)| (name, value.clone())).collect(),
		});
	}
}

/// Read side of a [`CountingObserver`].
#[derive(Debug, Clone, Default)]
pub struct Counter {
	calls: Rc<Cell<usize>>,
	exits: Rc<Cell<usize>>,
}

impl Counter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn observer(&self) -> CountingObserver {
		CountingObserver {
			counter: self.clone(),
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.get()
	}

	/// Returns and unwinds.
	pub fn exits(&self) -> usize {
		self.exits.get()
	}
}

/// Counts frames, standing in for an external profiler.
pub struct CountingObserver {
	counter: Counter,
}

impl Observer for CountingObserver {
	fn notify(&mut self, event: &Event<'_>) {
		let cell = match event.kind {
			EventKind::Call => &self.counter.calls,
			EventKind::Return | EventKind::Unwind => &self.counter.exits,
		};
		cell.set(cell.get() + 1);
	}
}
