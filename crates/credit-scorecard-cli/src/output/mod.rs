pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Keys whose array value is the row payload of a response.
const COLLECTION_KEYS: [&str; 2] = ["predictions", "feature_importance"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Row collection of a response plus the remaining summary fields.
///
/// Batch items nest the scored result under `result`; those fields are
/// hoisted so every row is flat.
pub fn split_rows(value: &Value) -> Option<(Vec<Map<String, Value>>, Map<String, Value>)> {
    let map = value.as_object()?;
    let (key, items) = COLLECTION_KEYS
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_array).map(|a| (*k, a)))?;

    let rows = items.iter().map(flatten_row).collect();
    let summary = map
        .iter()
        .filter(|(k, v)| k.as_str() != key && !v.is_object())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Some((rows, summary))
}

fn flatten_row(item: &Value) -> Map<String, Value> {
    let mut row = Map::new();
    if let Value::Object(fields) = item {
        for (k, v) in fields {
            match v {
                Value::Object(inner) if k == "result" => {
                    for (ik, iv) in inner {
                        row.insert(ik.clone(), iv.clone());
                    }
                }
                _ => {
                    row.insert(k.clone(), v.clone());
                }
            }
        }
    } else {
        row.insert("value".to_string(), item.clone());
    }
    row
}

/// Union of row keys in first-seen order.
pub fn row_headers(rows: &[Map<String, Value>]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
