//! Conversion between Pinecone's protobuf metadata and generic JSON maps.
//!
//! Pinecone stores metadata as a `google.protobuf.Struct`. Numbers there are
//! always doubles, so integers written through [`to_struct`] come back as
//! floating-point JSON numbers from [`to_map`].

use prost_types::value::Kind;
use prost_types::{ListValue, Struct, Value as ProtoValue};
use serde_json::{Number, Value};
use tessera_core::Metadata;

use crate::error::{Error, Result};

/// Reads a protobuf struct as a generic key/value map.
pub fn to_map(metadata: &Struct) -> Metadata {
    metadata
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), to_json(value)))
        .collect()
}

/// Writes a generic key/value map as a protobuf struct.
pub fn to_struct(metadata: &Metadata) -> Struct {
    Struct {
        fields: metadata
            .iter()
            .map(|(key, value)| (key.clone(), to_proto(value)))
            .collect(),
    }
}

/// Converts a JSON filter into a protobuf struct.
///
/// Filters must be JSON objects.
pub fn filter_to_struct(filter: &Value) -> Result<Struct> {
    match filter {
        Value::Object(map) => Ok(to_struct(map)),
        other => Err(Error::invalid_filter(format!(
            "expected an object, found {}",
            kind_name(other)
        ))),
    }
}

/// Returns the JSON kind of a value, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn to_json(value: &ProtoValue) -> Value {
    match &value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::NumberValue(number)) => Number::from_f64(*number).map_or(Value::Null, Value::Number),
        Some(Kind::StringValue(string)) => Value::String(string.clone()),
        Some(Kind::BoolValue(flag)) => Value::Bool(*flag),
        Some(Kind::StructValue(nested)) => Value::Object(to_map(nested)),
        Some(Kind::ListValue(list)) => Value::Array(list.values.iter().map(to_json).collect()),
    }
}

fn to_proto(value: &Value) -> ProtoValue {
    let kind = match value {
        Value::Null => Kind::NullValue(0),
        Value::Bool(flag) => Kind::BoolValue(*flag),
        Value::Number(number) => number.as_f64().map_or(Kind::NullValue(0), Kind::NumberValue),
        Value::String(string) => Kind::StringValue(string.clone()),
        Value::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().map(to_proto).collect(),
        }),
        Value::Object(map) => Kind::StructValue(to_struct(map)),
    };

    ProtoValue { kind: Some(kind) }
}
