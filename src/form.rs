//! Flattens a projected payload into the bracketed key/value pairs of a
//! form-encoded request body, e.g. `items[0][plan]=gold`.
//!
//! Percent-encoding is left to the transport. Note that this flattening is
//! coarser than the JSON payload: an explicit clear (`""` or `null`), an
//! empty list and an empty object all become a single `key=` pair.

use serde_json::{Map, Value};

pub fn to_form_pairs(payload: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = vec![];
    for (key, value) in payload {
        flatten(key, value, &mut pairs);
    }
    pairs
}

fn flatten(key: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => pairs.push((key.to_string(), String::new())),
        Value::Bool(b) => pairs.push((key.to_string(), b.to_string())),
        Value::Number(n) => pairs.push((key.to_string(), n.to_string())),
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Array(items) if items.is_empty() => pairs.push((key.to_string(), String::new())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(&format!("{}[{}]", key, i), item, pairs);
            }
        }
        Value::Object(fields) if fields.is_empty() => pairs.push((key.to_string(), String::new())),
        Value::Object(fields) => {
            for (name, item) in fields {
                flatten(&format!("{}[{}]", key, name), item, pairs);
            }
        }
    }
}
