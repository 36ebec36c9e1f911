//! Dot-path access into a JSON data document.
//!
//! `None` stands in for "undefined": a missing key, an out-of-range index, or a path that
//! runs through a scalar. Lookups never fail loudly.

use serde_json::{Map, Value};

/// Look up `path` (e.g. `"user.profile.name"`) in `document`.
///
/// Objects are indexed by key and arrays by a base-10 segment. Resolution stops with
/// `None` as soon as a segment is missing or the current value is not a container.
pub fn get_by_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(document, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => index(segment, items.len()).and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Return a copy of `document` with `value` written at `path`.
///
/// The input is never modified. Every container along the path is copied. Arrays keep
/// their shape when the segment is an in-range index. Any other segment turns the array
/// into an object keyed by index, keeping its elements. Scalar or missing ancestors are
/// replaced by an empty object so the write always lands.
pub fn set_by_path(document: &Value, path: &str, value: Value) -> Value {
    let segments: Vec<&str> = path.split('.').collect();
    assign(Some(document), &segments, value)
}

/// Rebuild `target` with `value` stored under `segments`.
fn assign(target: Option<&Value>, segments: &[&str], value: Value) -> Value {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };

    if let Some(Value::Array(items)) = target
        && let Some(i) = index(head, items.len())
    {
        let next = assign(items.get(i), rest, value);
        let mut items = items.clone();
        items[i] = next;
        return Value::Array(items);
    }

    let mut map = match target {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Array(items)) => spread(items),
        _ => Map::new(),
    };
    let next = assign(map.get(*head), rest, value);
    map.insert((*head).to_string(), next);
    Value::Object(map)
}

/// An array re-keyed as an object (`"0"`, `"1"`, ...) so a non-index write keeps its
/// elements.
fn spread(items: &[Value]) -> Map<String, Value> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (i.to_string(), item.clone()))
        .collect()
}

/// Parse an array index segment that is within `len`.
fn index(segment: &str, len: usize) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<usize>().ok().filter(|i| *i < len)
}
