//! Document type.
//!
//! Entities of the HR application (employees, leave requests, inventory
//! items, roles...) are loosely shaped documents owned by the hosted
//! database. The adapter never interprets their fields; it only carries the
//! document id next to the field map.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A document read from or written to a collection.
///
/// Serializes flat, with the id merged into the fields, which is the shape UI
/// hooks consume (`{"id": "...", "name": "...", ...}`).
///
/// # Examples
///
/// ```
/// use staffhub_datastore::types::Document;
/// use serde_json::json;
///
/// let doc = Document::from_value("emp-1", json!({"name": "Jane", "active": true}));
/// assert_eq!(doc.id(), "emp-1");
/// assert_eq!(doc.get("name"), Some(&json!("Jane")));
///
/// let flat = serde_json::to_value(&doc).unwrap();
/// assert_eq!(flat["id"], "emp-1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: String,
    fields: Map<String, Value>,
}

impl Document {
    /// Creates a document from an id and a field map.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Creates a document from an id and a JSON value.
    ///
    /// Non-object values produce a document without fields.
    pub fn from_value(id: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the document fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns a single field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the flat JSON representation (`id` plus fields).
    pub fn to_value(&self) -> Value {
        let mut flat = Map::with_capacity(self.fields.len() + 1);
        flat.insert("id".to_string(), Value::String(self.id.clone()));
        for (key, value) in &self.fields {
            if key != "id" {
                flat.insert(key.clone(), value.clone());
            }
        }
        Value::Object(flat)
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let extra = usize::from(!self.fields.contains_key("id"));
        let mut map = serializer.serialize_map(Some(self.fields.len() + extra))?;
        map.serialize_entry("id", &self.id)?;
        for (key, value) in &self.fields {
            if key != "id" {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}
