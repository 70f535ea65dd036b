use serde_json::Value;

use super::{format_value, split_rows};

/// One line per answer: `score rating` for a prediction, one line per row for
/// batches and rankings.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{}", line);
    }
}

fn minimal_lines(value: &Value) -> Vec<String> {
    if let Some((rows, _)) = split_rows(value) {
        return rows.iter().map(|row| summarize(&Value::Object(row.clone()))).collect();
    }
    vec![summarize(value)]
}

fn summarize(value: &Value) -> String {
    let Some(map) = value.as_object() else {
        return format_value(value);
    };

    if let (Some(score), Some(level)) = (map.get("credit_score"), map.get("risk_level")) {
        return format!("{} {}", format_value(score), format_value(level));
    }
    if let (Some(feature), Some(importance)) = (map.get("feature"), map.get("importance")) {
        return format!("{} {}", format_value(feature), format_value(importance));
    }
    if let Some(error) = map.get("error") {
        return format!("error: {}", format_value(error));
    }
    for key in ["valid", "version"] {
        if let Some(val) = map.get(key) {
            return format_value(val);
        }
    }
    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_value(val)),
        None => String::new(),
    }
}
