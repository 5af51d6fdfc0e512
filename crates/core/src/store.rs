// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Single-slot snapshot store.
//!
//! Each wrapper owns exactly one slot. Every completed invocation replaces the
//! slot's content wholesale; nothing is merged across invocations. Concurrent
//! or recursive invocations of the same wrapper race on the slot and the last
//! writer wins.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{error::Error, snapshot::Snapshot};

#[derive(Debug, Default)]
struct Slot {
	snapshot: Arc<Snapshot>,
	error: Option<Error>,
}

#[derive(Debug, Default)]
pub struct Store {
	slot: RwLock<Slot>,
}

impl Store {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the slot with the snapshot of a completed invocation.
	pub fn publish(&self, snapshot: Snapshot) {
		*self.slot.write() = Slot {
			snapshot: Arc::new(snapshot),
			error: None,
		};
	}

	/// Record that the last invocation could not be captured. The previous
	/// snapshot is discarded so it cannot be mistaken for the failed call's.
	pub fn fail(&self, error: Error) {
		*self.slot.write() = Slot {
			snapshot: Arc::new(Snapshot::new()),
			error: Some(error),
		};
	}

	pub fn snapshot(&self) -> Arc<Snapshot> {
		Arc::clone(&self.slot.read().snapshot)
	}

	pub fn error(&self) -> Option<Error> {
		self.slot.read().error.clone()
	}
}
