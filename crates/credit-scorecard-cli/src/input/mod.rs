pub mod file;
pub mod stdin;

use serde_json::Value;

/// JSON from `--input <file>` when given, otherwise from piped stdin.
pub fn read_input(path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_json_value(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(data)
    } else {
        Err("--input <file.json> or stdin required".into())
    }
}
