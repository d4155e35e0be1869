//! Dotted-path access into JSON documents
//!
//! Template references and cache summaries address fields inside arbitrary
//! nested documents by dotted path ("status.network.sshPort"). Array
//! segments are numeric indices.

use serde_json::Value;

/// Read the value at a dotted path, or None if any segment is missing
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write a value at a dotted path, creating intermediate objects as needed.
/// Fails (returns false) when a non-terminal segment is already a scalar or
/// an array index is out of bounds.
pub fn set_path(doc: &mut Value, path: &str, value: Value) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return false;
    }
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = doc;
    for segment in parents {
        current = match current {
            Value::Object(map) => map
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new())),
            Value::Array(items) => {
                let Some(index) = segment.parse::<usize>().ok().filter(|i| *i < items.len())
                else {
                    return false;
                };
                &mut items[index]
            }
            _ => return false,
        };
    }

    match current {
        Value::Object(map) => {
            map.insert((*last).to_string(), value);
            true
        }
        Value::Array(items) => {
            let Some(index) = last.parse::<usize>().ok().filter(|i| *i < items.len()) else {
                return false;
            };
            items[index] = value;
            true
        }
        _ => false,
    }
}

/// Render the value at a path as a plain string, if it is a scalar
pub fn get_path_str(doc: &Value, path: &str) -> Option<String> {
    match get_path(doc, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
