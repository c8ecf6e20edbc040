//! Predicate evaluation and ordering for the in-memory backend.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::filter::Predicate;
use crate::types::{CollectionQuery, Document, OrderBy, SortDirection};

/// Looks up a field, following dotted paths into nested maps.
///
/// A literal key containing dots wins over the nested interpretation.
pub(crate) fn lookup<'a>(fields: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = fields.get(path) {
        return Some(value);
    }
    let mut parts = path.split('.');
    let mut current = fields.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Equality with numeric normalization (`1 == 1.0`).
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Returns true if the document fields satisfy `predicate`.
pub(crate) fn matches(predicate: &Predicate, fields: &Map<String, Value>) -> bool {
    let Some(actual) = lookup(fields, predicate.field()) else {
        return false;
    };
    match predicate {
        Predicate::StringEq { value, .. } => actual.as_str() == Some(value.as_str()),
        Predicate::NumericEq { value, .. } => {
            values_equal(actual, &Value::Number(value.clone()))
        }
        Predicate::BooleanEq { value, .. } => actual.as_bool() == Some(*value),
        Predicate::InSet { values, .. } => values.iter().any(|v| values_equal(actual, v)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: by type first, then by value.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (left, right) in x.iter().zip(y) {
                let ord = compare_values(left, right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn sort_documents(documents: &mut [Document], order_by: &OrderBy) {
    documents.sort_by(|a, b| {
        let ord = match (lookup(a.fields(), &order_by.field), lookup(b.fields(), &order_by.field)) {
            (Some(x), Some(y)) => compare_values(x, y),
            _ => Ordering::Equal,
        };
        match order_by.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Applies `query` to documents already in id order.
pub(crate) fn apply_query<'a, I>(documents: I, query: &CollectionQuery) -> Vec<Document>
where
    I: IntoIterator<Item = (&'a String, &'a Map<String, Value>)>,
{
    let mut selected: Vec<Document> = documents
        .into_iter()
        .filter(|(_, fields)| query.predicates.iter().all(|p| matches(p, fields)))
        .filter(|(_, fields)| {
            query
                .order_by
                .as_ref()
                .is_none_or(|order| lookup(fields, &order.field).is_some())
        })
        .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
        .collect();

    if let Some(order_by) = &query.order_by {
        sort_documents(&mut selected, order_by);
    }

    if let Some(limit) = query.limit {
        selected.truncate(limit);
    }

    selected
}
