use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_value, row_headers, split_rows};

pub fn print_table(value: &Value) {
    if let Some((rows, summary)) = split_rows(value) {
        print_rows(&rows);
        if !summary.is_empty() {
            println!();
            print_fields(&summary);
        }
        return;
    }

    match value {
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .filter(|(k, _)| k.as_str() != "warnings")
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            print_fields(&fields);
            print_warnings(map.get("warnings"));
        }
        other => println!("{}", format_value(other)),
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Map<String, Value>]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let headers = row_headers(rows);
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(h).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(cells);
    }
    println!("{}", Table::from(builder));
}

fn print_warnings(warnings: Option<&Value>) {
    if let Some(Value::Array(items)) = warnings {
        if !items.is_empty() {
            println!("\nWarnings:");
            for w in items.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }
}
