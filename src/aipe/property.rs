//! Conversion between caller-facing string properties and AIPE's loosely typed JSON values.
//!
//! Callers see every property as a string. On the wire a property is either a JSON string or
//! a JSON boolean, and the two are bridged by a fixed convention: the exact strings `"true"` and
//! `"false"` travel as booleans and come back as those strings. The convention is lossy by
//! contract, so a string property whose value is literally `"true"` reaches AIPE as a boolean.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::DecodeError};

/// Caller-facing property bag.
pub type Properties = BTreeMap<String, String>;
/// Backend-facing property bag.
pub type WireProperties = BTreeMap<String, PropertyValue>;

/// Property key AIPE reserves for server-managed metadata; never exposed to callers.
pub const SYSTEM_PROPERTY: &str = "system";

/// Property value as AIPE stores it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
	/// Boolean property.
	Bool(bool),
	/// String property.
	String(String),
}
impl PropertyValue {
	/// Applies the caller-to-wire convention: exactly `"true"`/`"false"` become booleans.
	pub fn from_caller(value: &str) -> Self {
		match value {
			"true" => Self::Bool(true),
			"false" => Self::Bool(false),
			other => Self::String(other.to_owned()),
		}
	}

	/// Renders the value the way callers see it.
	pub fn into_caller(self) -> String {
		match self {
			Self::Bool(value) => value.to_string(),
			Self::String(value) => value,
		}
	}
}
impl TryFrom<(&str, Value)> for PropertyValue {
	type Error = DecodeError;

	fn try_from((key, value): (&str, Value)) -> Result<Self, Self::Error> {
		match value {
			Value::Bool(value) => Ok(Self::Bool(value)),
			Value::String(value) => Ok(Self::String(value)),
			other => Err(DecodeError::UnsupportedPropertyValue {
				key: key.to_owned(),
				kind: json_kind(&other),
			}),
		}
	}
}

/// Converts caller properties into their wire form.
pub fn to_wire(properties: &Properties) -> WireProperties {
	properties
		.iter()
		.map(|(key, value)| (key.clone(), PropertyValue::from_caller(value)))
		.collect()
}

/// Converts a wire `dataObject` into caller properties, dropping [`SYSTEM_PROPERTY`].
///
/// Values other than strings and booleans are rejected rather than coerced.
pub fn from_wire(data_object: Map<String, Value>) -> Result<Properties, DecodeError> {
	data_object
		.into_iter()
		.filter(|(key, _)| key != SYSTEM_PROPERTY)
		.map(|(key, value)| {
			let value = PropertyValue::try_from((key.as_str(), value))?;

			Ok((key, value.into_caller()))
		})
		.collect()
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn wire(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			_ => panic!("Fixture must be a JSON object."),
		}
	}

	#[test]
	fn from_wire_strips_system_and_formats_booleans() {
		let properties = from_wire(wire(json!({
			"system": { "id": "obj-1", "typeName": "server" },
			"hostname": "db-01",
			"active": true,
			"retired": false,
		})))
		.expect("Strings and booleans should decode.");

		assert_eq!(
			properties,
			Properties::from([
				("active".into(), "true".into()),
				("hostname".into(), "db-01".into()),
				("retired".into(), "false".into()),
			])
		);
	}

	#[test]
	fn from_wire_rejects_other_json_types() {
		let err = from_wire(wire(json!({ "cores": 8 })))
			.expect_err("Numbers are outside the property contract.");

		assert!(matches!(
			err,
			DecodeError::UnsupportedPropertyValue { ref key, kind: "number" } if key == "cores"
		));
		assert!(from_wire(wire(json!({ "tags": ["a"] }))).is_err());
		assert!(from_wire(wire(json!({ "owner": null }))).is_err());
	}

	#[test]
	fn to_wire_coerces_exact_boolean_literals_only() {
		let properties = Properties::from([
			("a".into(), "true".into()),
			("b".into(), "false".into()),
			("c".into(), "True".into()),
			("d".into(), "yes".into()),
		]);
		let encoded = serde_json::to_value(to_wire(&properties)).expect("Wire map should serialize.");

		assert_eq!(encoded, json!({ "a": true, "b": false, "c": "True", "d": "yes" }));
	}

	#[test]
	fn round_trip_restores_wire_values() {
		let original = wire(json!({ "enabled": true, "name": "edge", "tier": "gold", "muted": false }));
		let restored = serde_json::to_value(to_wire(
			&from_wire(original.clone()).expect("Fixture should decode."),
		))
		.expect("Wire map should serialize.");

		assert_eq!(restored, Value::Object(original));
	}

	#[test]
	fn literal_boolean_strings_do_not_survive_as_strings() {
		// A string property holding "true" comes back from AIPE as the string and is re-sent as a
		// boolean; the convention cannot tell the two apart.
		let original = wire(json!({ "flag": "true" }));
		let restored = serde_json::to_value(to_wire(
			&from_wire(original.clone()).expect("Fixture should decode."),
		))
		.expect("Wire map should serialize.");

		assert_ne!(restored, Value::Object(original));
		assert_eq!(restored, json!({ "flag": true }));
	}
}
