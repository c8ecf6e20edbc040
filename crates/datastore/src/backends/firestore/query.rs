//! `StructuredQuery` construction for the `runQuery` endpoint.

use serde_json::{Value, json};

use crate::filter::{FilterOperator, Predicate};
use crate::types::{CollectionQuery, SortDirection};

use super::value::encode_value;

/// Builds the `runQuery` request body for `query` on `collection`.
///
/// A single predicate becomes a `fieldFilter`; several are combined in a
/// `compositeFilter` with `AND`.
pub fn structured_query(collection: &str, query: &CollectionQuery) -> Value {
    let mut structured = json!({
        "from": [{"collectionId": collection}],
    });

    let mut filters: Vec<Value> = query.predicates.iter().map(field_filter).collect();
    match filters.len() {
        0 => {}
        1 => structured["where"] = filters.remove(0),
        _ => {
            structured["where"] = json!({
                "compositeFilter": {"op": "AND", "filters": filters}
            });
        }
    }

    if let Some(order_by) = &query.order_by {
        let direction = match order_by.direction {
            SortDirection::Asc => "ASCENDING",
            SortDirection::Desc => "DESCENDING",
        };
        structured["orderBy"] = json!([{
            "field": {"fieldPath": field_path(&order_by.field)},
            "direction": direction,
        }]);
    }

    if let Some(limit) = query.limit {
        structured["limit"] = json!(limit);
    }

    json!({ "structuredQuery": structured })
}

fn field_filter(predicate: &Predicate) -> Value {
    let op = match predicate.operator() {
        FilterOperator::Eq => "EQUAL",
        FilterOperator::In => "IN",
    };
    json!({
        "fieldFilter": {
            "field": {"fieldPath": field_path(predicate.field())},
            "op": op,
            "value": encode_value(&predicate.value()),
        }
    })
}

/// Converts a dotted path into a Firestore field path, quoting segments that
/// are not plain identifiers.
pub fn field_path(path: &str) -> String {
    path.split('.')
        .map(quote_segment)
        .collect::<Vec<_>>()
        .join(".")
}

/// Quotes a single field name if it is not a plain identifier.
pub fn quote_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    let simple = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        segment.to_string()
    } else {
        format!("`{}`", segment.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
