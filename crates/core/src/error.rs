// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::result;

/// Capture setup failures.
///
/// Errors raised by a target are never converted into this type: an `Err`
/// returned by the target is handed back to the caller as is, and a panic keeps
/// unwinding with its original payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The thread's observer slot was occupied when a traced wrapper tried to
	/// install its own observer. The call ran without capture.
	#[error("cannot trace `{target}`: another execution observer is installed on this thread")]
	ObserverConflict {
		target: String,
	},

	/// The traced target completed without entering any traced frame, so none
	/// of its bindings could be observed.
	#[error("cannot trace `{target}`: the call did not enter any traced frame")]
	Untraced {
		target: String,
	},

	/// Returned by [`crate::hook::install`] when the slot is occupied.
	#[error("an execution observer is already installed on this thread")]
	Install,
}

pub type Result<T> = result::Result<T, Error>;
