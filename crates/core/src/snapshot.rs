// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use indexmap::IndexMap;
use serde::Serialize;

use crate::{frame::Locals, value::Value};

/// The variables a target bound during one invocation, name to value, in the
/// order they were first bound.
///
/// A value is the one recorded last for its name, at a binding or an
/// assignment. Mutation in place is not observed: after
/// `let mut v = Vec::new(); v.push(1);` the entry of `v` is `[]`. When an inner
/// block shadows a name, the outer entry is restored once the block is left.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(IndexMap<String, Value>);

impl Snapshot {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value))
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// The snapshot as a JSON object, convenient for comparisons.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(self.0.iter().map(|(name, value)| (name.clone(), value.to_json())).collect())
	}
}

impl From<Locals> for Snapshot {
	fn from(locals: Locals) -> Self {
		Self(locals.into_iter().map(|(name, value)| (name.to_string(), value)).collect())
	}
}

impl FromIterator<(String, Value)> for Snapshot {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a Snapshot {
	type Item = (&'a String, &'a Value);
	type IntoIter = indexmap::map::Iter<'a, String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl Display for Snapshot {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("{")?;
		for (idx, (name, value)) in self.0.iter().enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{name}: {value}")?;
		}
		f.write_str("}")
	}
}

#[cfg(test)]
pub mod tests {
	use serde_json::json;

	use super::Snapshot;
	use crate::{frame::Locals, value::Value};

	fn locals() -> Locals {
		let mut locals = Locals::new();
		locals.bind("b", Value::of(&1));
		locals.bind("a", Value::of(&2));
		locals.bind("b", Value::of(&3));
		locals
	}

	#[test]
	fn test_from_locals_keeps_first_binding_order() {
		let snapshot = Snapshot::from(locals());

		assert_eq!(snapshot.names().collect::<Vec<_>>(), vec!["b", "a"]);
		assert_eq!(snapshot.get("b").unwrap(), &json!(3));
		assert_eq!(snapshot.len(), 2);
		assert!(snapshot.contains("a"));
		assert!(!snapshot.contains("c"));
	}

	#[test]
	fn test_display() {
		let snapshot = Snapshot::from(locals());
		assert_eq!(snapshot.to_string(), "{b: 3, a: 2}");
		assert_eq!(Snapshot::new().to_string(), "{}");
	}

	#[test]
	fn test_to_json() {
		let snapshot = Snapshot::from(locals());
		assert_eq!(snapshot.to_json(), json!({"a": 2, "b": 3}));
		assert_eq!(serde_json::to_value(&snapshot).unwrap(), json!({"a": 2, "b": 3}));
	}
}
