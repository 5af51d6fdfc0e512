// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Compile-time selection of how a binding is captured.
//!
//! Generated code evaluates `(&&&Probe(&binding)).introspect_value()` with all
//! three probe traits in scope. Method resolution tries the receiver with the
//! most references first, so the serde impl wins when it applies, then `Debug`,
//! then the opaque fallback.

use std::fmt::Debug;

use serde::Serialize;

use crate::value::Value;

pub struct Probe<'a, T: ?Sized>(pub &'a T);

pub trait SerializeProbe {
	fn introspect_value(&self) -> Value;
}

impl<T: Serialize + ?Sized> SerializeProbe for &&Probe<'_, T> {
	fn introspect_value(&self) -> Value {
		Value::of(self.0)
	}
}

pub trait DebugProbe {
	fn introspect_value(&self) -> Value;
}

impl<T: Debug + ?Sized> DebugProbe for &Probe<'_, T> {
	fn introspect_value(&self) -> Value {
		Value::debug(self.0)
	}
}

pub trait OpaqueProbe {
	fn introspect_value(&self) -> Value;
}

impl<T: ?Sized> OpaqueProbe for Probe<'_, T> {
	fn introspect_value(&self) -> Value {
		Value::opaque(self.0)
	}
}

#[cfg(test)]
pub mod tests {
	use serde_json::json;

	use super::{DebugProbe as _, OpaqueProbe as _, Probe, SerializeProbe as _};
	use crate::value::Value;

	#[derive(Debug)]
	struct OnlyDebug;

	struct Nothing;

	#[test]
	fn test_prefers_serialize() {
		let total = 5i64;
		assert_eq!((&&&Probe(&total)).introspect_value(), json!(5));
	}

	#[test]
	fn test_falls_back_to_debug() {
		let value = OnlyDebug;
		assert_eq!((&&&Probe(&value)).introspect_value(), Value::Debug("OnlyDebug".to_string()));
	}

	#[test]
	fn test_falls_back_to_opaque() {
		let value = Nothing;
		assert!((&&&Probe(&value)).introspect_value().is_opaque());
	}

	#[test]
	fn test_through_references() {
		let mut counter = 3u32;
		let handle = &mut counter;
		assert_eq!((&&&Probe(&handle)).introspect_value(), json!(3));
	}
}
