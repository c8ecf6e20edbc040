//! Subcommand execution.

use anyhow::{Context, bail};
use serde_json::{Map, Value, json};

use staffhub_datastore::core::DocumentStore;
use staffhub_datastore::filter::normalize_filters;
use staffhub_datastore::service::DataService;
use staffhub_datastore::types::{FetchOptions, OrderBy};

use crate::config::Command;

/// Parses a `FIELD=VALUE` filter argument.
///
/// VALUE is parsed as JSON when possible (`2`, `true`, `["a","b"]`) and is
/// otherwise taken as a plain string.
pub fn parse_filter_arg(arg: &str) -> anyhow::Result<(String, Value)> {
    let Some((field, raw)) = arg.split_once('=') else {
        bail!("filter '{}' is not of the form FIELD=VALUE", arg);
    };
    let field = field.trim();
    if field.is_empty() {
        bail!("filter '{}' has an empty field name", arg);
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}

/// Builds a filter object from repeated `--filter` arguments, in order.
pub fn filters_from_args(args: &[String]) -> anyhow::Result<Value> {
    let mut filters = Map::new();
    for arg in args {
        let (field, value) = parse_filter_arg(arg)?;
        filters.insert(field, value);
    }
    Ok(Value::Object(filters))
}

fn parse_json(raw: &str, what: &str) -> anyhow::Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("{} is not valid JSON", what))
}

/// Runs `command` against `service` and returns the JSON to print.
pub async fn run<S>(service: &DataService<S>, command: Command) -> anyhow::Result<Value>
where
    S: DocumentStore,
{
    let output = match command {
        Command::Resolve { endpoint } => match service.resolver().try_resolve(&endpoint) {
            Ok(resolution) => json!({
                "endpoint": endpoint,
                "collection": resolution.collection,
                "matchedBy": format!("{:?}", resolution.matched_by).to_lowercase(),
            }),
            Err(e) => json!({
                "endpoint": endpoint,
                "collection": service.resolver().default_collection(),
                "matchedBy": "default",
                "reason": e.to_string(),
            }),
        },
        Command::Filters { json } => {
            let filters = parse_json(&json, "filter object")?;
            serde_json::to_value(normalize_filters(&filters))?
        }
        Command::Fetch {
            endpoint,
            filters,
            order_by,
            limit,
        } => {
            let mut options = FetchOptions::new().with_filters(filters_from_args(&filters)?);
            if let Some(order_by) = order_by {
                let Some(parsed) = OrderBy::parse(&order_by) else {
                    bail!("invalid --order-by '{}'", order_by);
                };
                options = options.with_order_by(parsed);
            }
            if let Some(limit) = limit {
                options = options.with_limit(limit);
            }
            serde_json::to_value(service.fetch_data(&endpoint, &options).await)?
        }
        Command::Get { endpoint } => serde_json::to_value(service.fetch_by_id(&endpoint).await)?,
        Command::Create { endpoint, json } => {
            let data = parse_json(&json, "document")?;
            serde_json::to_value(service.create(&endpoint, data).await)?
        }
        Command::Update { endpoint, json } => {
            let data = parse_json(&json, "document")?;
            serde_json::to_value(service.update(&endpoint, data).await)?
        }
        Command::Delete { endpoint } => serde_json::to_value(service.delete(&endpoint).await)?,
    };
    Ok(output)
}

/// Returns true for envelopes reporting a failure.
pub fn is_failure(output: &Value) -> bool {
    output.get("success") == Some(&Value::Bool(false))
}
