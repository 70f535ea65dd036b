use serde_json::Value;
use std::io;

use super::{format_value, row_headers, split_rows};

/// Batch and ranking responses become one row per item; anything else is
/// written as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some((rows, _)) = split_rows(value) {
        let headers = row_headers(&rows);
        let _ = wtr.write_record(&headers);
        for row in &rows {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| row.get(h).map(format_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&cells);
        }
    } else if let Value::Object(map) = value {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_value(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_value(value)]);
    }

    let _ = wtr.flush();
}
