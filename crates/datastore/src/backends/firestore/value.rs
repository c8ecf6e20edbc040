//! Conversion between JSON and Firestore typed values.
//!
//! Firestore's REST API wraps every value in a single-key object naming its
//! type (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). Integers are
//! transported as strings. Timestamps, references and bytes decode to their
//! string forms; geo points decode to `{latitude, longitude}` objects.

use serde_json::{Map, Number, Value, json};

use crate::error::{StoreError, StoreResult};
use crate::types::Document;

/// Encodes a JSON value as a Firestore value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({"nullValue": null}),
        Value::Bool(b) => json!({"booleanValue": b}),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({"integerValue": i.to_string()})
            } else {
                json!({"doubleValue": n.as_f64().unwrap_or(f64::NAN)})
            }
        }
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({"arrayValue": {"values": values}})
        }
        Value::Object(fields) => json!({"mapValue": {"fields": encode_fields(fields)}}),
    }
}

/// Encodes a field map as the `fields` object of a Firestore document.
pub fn encode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(name, value)| (name.clone(), encode_value(value)))
            .collect(),
    )
}

/// Decodes a Firestore value into JSON.
pub fn decode_value(value: &Value) -> StoreResult<Value> {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return Err(invalid(format!("not a typed value: {}", value)));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| invalid(format!("bad booleanValue: {}", inner))),
        "integerValue" => decode_integer(inner),
        "doubleValue" => Ok(decode_double(inner)),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| invalid(format!("bad {}: {}", kind, inner))),
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        })),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<StoreResult<Vec<_>>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => match inner.get("fields") {
            Some(fields) => Ok(Value::Object(decode_fields(fields)?)),
            None => Ok(Value::Object(Map::new())),
        },
        other => Err(invalid(format!("unknown value type '{}'", other))),
    }
}

/// Decodes the `fields` object of a Firestore document.
pub fn decode_fields(fields: &Value) -> StoreResult<Map<String, Value>> {
    let Some(fields) = fields.as_object() else {
        return Err(invalid(format!("fields is not an object: {}", fields)));
    };
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode_value(value)?)))
        .collect()
}

/// Decodes a Firestore document resource into a [`Document`].
///
/// The id is the last segment of the resource `name`.
pub fn decode_document(resource: &Value) -> StoreResult<Document> {
    let name = resource
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("document has no name".to_string()))?;
    let id = name.rsplit('/').next().unwrap_or(name);
    let fields = match resource.get("fields") {
        Some(fields) => decode_fields(fields)?,
        None => Map::new(),
    };
    Ok(Document::new(id, fields))
}

fn decode_integer(inner: &Value) -> StoreResult<Value> {
    let parsed = match inner {
        Value::String(s) => s.parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    parsed
        .map(|i| Value::Number(i.into()))
        .ok_or_else(|| invalid(format!("bad integerValue: {}", inner)))
}

/// Non-finite doubles (`"NaN"`, `"Infinity"`) have no JSON form and decode
/// to null.
fn decode_double(inner: &Value) -> Value {
    inner
        .as_f64()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

fn invalid(message: String) -> StoreError {
    StoreError::Serialization { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode_value(&json!(42)), json!({"integerValue": "42"}));
        assert_eq!(encode_value(&json!(1.5)), json!({"doubleValue": 1.5}));
        assert_eq!(encode_value(&json!(true)), json!({"booleanValue": true}));
        assert_eq!(encode_value(&json!(null)), json!({"nullValue": null}));
        assert_eq!(encode_value(&json!("x")), json!({"stringValue": "x"}));
    }

    #[test]
    fn test_encode_nested() {
        let encoded = encode_value(&json!({"tags": ["a"], "meta": {"n": 1}}));
        assert_eq!(
            encoded,
            json!({"mapValue": {"fields": {
                "tags": {"arrayValue": {"values": [{"stringValue": "a"}]}},
                "meta": {"mapValue": {"fields": {"n": {"integerValue": "1"}}}}
            }}})
        );
    }

    #[test]
    fn test_decode_special_types() {
        assert_eq!(
            decode_value(&json!({"timestampValue": "2025-01-01T00:00:00Z"})).unwrap(),
            json!("2025-01-01T00:00:00Z")
        );
        assert_eq!(
            decode_value(&json!({"geoPointValue": {"latitude": 59.9, "longitude": 10.7}}))
                .unwrap(),
            json!({"latitude": 59.9, "longitude": 10.7})
        );
        assert_eq!(decode_value(&json!({"doubleValue": "NaN"})).unwrap(), json!(null));
        assert_eq!(decode_value(&json!({"arrayValue": {}})).unwrap(), json!([]));
        assert_eq!(decode_value(&json!({"mapValue": {}})).unwrap(), json!({}));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_value(&json!({"integerValue": "forty"})).is_err());
        assert!(decode_value(&json!({"mysteryValue": 1})).is_err());
        assert!(decode_value(&json!("plain")).is_err());
    }

    #[test]
    fn test_decode_document() {
        let doc = decode_document(&json!({
            "name": "projects/p/databases/(default)/documents/leaves/abc123",
            "fields": {"days": {"integerValue": "3"}}
        }))
        .unwrap();
        assert_eq!(doc.id(), "abc123");
        assert_eq!(doc.get("days"), Some(&json!(3)));
    }
}
