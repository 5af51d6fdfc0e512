// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Captured representation of a single variable.

use std::{
	any::type_name,
	fmt,
	fmt::{Debug, Display, Formatter},
};

use serde::{Serialize, Serializer};

/// The value a variable held when it was captured.
///
/// Which variant a binding ends up as is decided where the binding is recorded:
/// types implementing [`Serialize`] become [`Value::Data`], types that only
/// implement [`Debug`] become [`Value::Debug`], everything else is recorded as
/// [`Value::Opaque`] with its type name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Data(serde_json::Value),
	Debug(String),
	Opaque(&'static str),
}

impl Value {
	/// Capture a serializable value.
	///
	/// Serialization can still fail at runtime (maps with non-string keys,
	/// failing `Serialize` impls); such values are recorded as opaque.
	pub fn of<T: Serialize + ?Sized>(value: &T) -> Self {
		match serde_json::to_value(value) {
			Ok(data) => Value::Data(data),
			Err(_) => Value::Opaque(type_name::<T>()),
		}
	}

	/// Capture a value through its `Debug` rendering.
	pub fn debug<T: Debug + ?Sized>(value: &T) -> Self {
		Value::Debug(format!("{:?}", value))
	}

	/// Record only the type of a value.
	pub fn opaque<T: ?Sized>(_value: &T) -> Self {
		Value::Opaque(type_name::<T>())
	}

	pub fn as_data(&self) -> Option<&serde_json::Value> {
		match self {
			Value::Data(data) => Some(data),
			_ => None,
		}
	}

	pub fn is_opaque(&self) -> bool {
		matches!(self, Value::Opaque(_))
	}

	/// JSON rendering of the value. Debug renderings become strings, opaque
	/// values become `"<type name>"`.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Value::Data(data) => data.clone(),
			Value::Debug(rendered) => serde_json::Value::String(rendered.clone()),
			Value::Opaque(ty) => serde_json::Value::String(format!("<{ty}>")),
		}
	}
}

impl From<serde_json::Value> for Value {
	fn from(data: serde_json::Value) -> Self {
		Value::Data(data)
	}
}

impl PartialEq<serde_json::Value> for Value {
	fn eq(&self, other: &serde_json::Value) -> bool {
		match self {
			Value::Data(data) => data == other,
			_ => false,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Data(data) => Display::fmt(data, f),
			Value::Debug(rendered) => f.write_str(rendered),
			Value::Opaque(ty) => write!(f, "<{ty}>"),
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Data(data) => data.serialize(serializer),
			Value::Debug(rendered) => serializer.serialize_str(rendered),
			Value::Opaque(ty) => serializer.collect_str(&format_args!("<{ty}>")),
		}
	}
}

#[cfg(test)]
pub mod tests {
	use std::collections::HashMap;

	use serde_json::json;

	use super::Value;

	#[derive(Debug)]
	struct OnlyDebug {
		id: u8,
	}

	struct Nothing;

	#[test]
	fn test_of_serializable() {
		assert_eq!(Value::of(&42i64), json!(42));
		assert_eq!(Value::of("abc"), json!("abc"));
		assert_eq!(Value::of(&vec![1, 2]), json!([1, 2]));
	}

	#[test]
	fn test_as_data() {
		assert_eq!(Value::of(&[1, 2]).as_data(), Some(&json!([1, 2])));
		let debug = Value::debug(&OnlyDebug {
			id: 1,
		});
		assert_eq!(debug.as_data(), None);
		assert_eq!(Value::opaque(&Nothing).as_data(), None);
	}

	#[test]
	fn test_of_unserializable_map_key() {
		let mut map = HashMap::new();
		map.insert((1, 2), "pair");

		let value = Value::of(&map);
		assert!(value.is_opaque());
	}

	#[test]
	fn test_debug() {
		let value = Value::debug(&OnlyDebug {
			id: 7,
		});
		assert_eq!(value, Value::Debug("OnlyDebug { id: 7 }".to_string()));
		assert_eq!(value.to_string(), "OnlyDebug { id: 7 }");
		assert_eq!(value.to_json(), json!("OnlyDebug { id: 7 }"));
	}

	#[test]
	fn test_opaque() {
		let value = Value::opaque(&Nothing);
		assert!(value.is_opaque());
		assert!(value.to_string().ends_with("Nothing>"));
		assert_ne!(value, json!(null));
	}
}
