// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Variadic argument lists.
//!
//! A callable that accepts any number of positional and keyword arguments
//! takes a single [`Args`]. Wrapping it adds no parameters: the wrapper is
//! called with `(args,)` exactly like the callable itself.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Args {
	positional: Vec<serde_json::Value>,
	keyword: IndexMap<String, serde_json::Value>,
}

impl Args {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a positional argument.
	pub fn arg(mut self, value: impl Into<serde_json::Value>) -> Self {
		self.positional.push(value.into());
		self
	}

	/// Set a keyword argument, replacing an earlier one with the same name.
	pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.keyword.insert(name.into(), value.into());
		self
	}

	pub fn positional(&self) -> &[serde_json::Value] {
		&self.positional
	}

	pub fn keyword(&self) -> &IndexMap<String, serde_json::Value> {
		&self.keyword
	}

	pub fn get(&self, index: usize) -> Option<&serde_json::Value> {
		self.positional.get(index)
	}

	pub fn get_keyword(&self, name: &str) -> Option<&serde_json::Value> {
		self.keyword.get(name)
	}

	pub fn len(&self) -> usize {
		self.positional.len() + self.keyword.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positional.is_empty() && self.keyword.is_empty()
	}
}

impl<V: Into<serde_json::Value>> FromIterator<V> for Args {
	fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
		Self {
			positional: iter.into_iter().map(Into::into).collect(),
			keyword: IndexMap::new(),
		}
	}
}
