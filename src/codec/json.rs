//! JSON encoding with camelCase key normalization.
//!
//! Incoming documents may use any key casing (`hat_size`, `HatSize`); every
//! object key is rewritten to lower camelCase before binding into a shape.
//! Output needs no renaming since shapes serialize their declared names.

use bytes::Bytes;
use serde_json::{Map, Value};

use super::{CodecError, Message};

pub fn encode<M: Message>(message: &M) -> Result<Bytes, CodecError> {
    Ok(Bytes::from(serde_json::to_vec(message)?))
}

pub fn decode<M: Message>(bytes: &[u8]) -> Result<M, CodecError> {
    let value = decode_value(bytes)?;
    Ok(serde_json::from_value(value)?)
}

/// Parse an untyped JSON document and normalize its keys.
pub fn decode_value(bytes: &[u8]) -> Result<Value, CodecError> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(camel_case_keys(value))
}

/// Rewrite every object key in the document to lower camelCase.
///
/// Arrays are mapped element-wise; scalars are returned untouched.
pub fn camel_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (camel_case(&key), camel_case_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(camel_case_keys).collect()),
        scalar => scalar,
    }
}

/// Convert a single key: `hat_size` → `hatSize`, `HatSize` → `hatSize`.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
    }

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('_', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }

    out
}
