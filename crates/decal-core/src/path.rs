#![forbid(unsafe_code)]

//! Key-path lookup over serialized values.
//!
//! A key path is a dot-separated list of segments, each optionally followed
//! by bracketed array indices: `owner.name`, `tags.0`, `rows[2].cells[0]`.
//! Object segments select a field; numeric segments index into arrays.
//! The empty path resolves to the value itself.
//!
//! Any segment that cannot be resolved makes the whole lookup `None`.

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

/// Resolve `path` inside `value`.
#[must_use]
pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| {
        let (key, indices) = split_indices(segment)?;
        let mut current = if key.is_empty() {
            current
        } else {
            step(current, key)?
        };
        for index in indices {
            current = current.as_array()?.get(index)?;
        }
        Some(current)
    })
}

/// Serialize `object` and resolve `path` inside it.
///
/// Returns `None` if the object fails to serialize or the path is absent.
pub fn lookup<T: Serialize + ?Sized>(object: &T, path: &str) -> Option<Value> {
    let value = match serde_json::to_value(object) {
        Ok(value) => value,
        Err(err) => {
            trace!(path, error = %err, "key-path lookup on unserializable value");
            return None;
        }
    };
    get(&value, path).cloned()
}

/// Strict equality for looked-up values.
///
/// Numbers compare by numeric value, so `1` matches `1.0`; everything else
/// compares structurally.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) if l.is_f64() || r.is_f64() => {
            l.as_f64() == r.as_f64()
        }
        _ => left == right,
    }
}

fn step<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => items.get(key.parse::<usize>().ok()?),
        _ => None,
    }
}

/// Split `rows[2][0]` into `("rows", [2, 0])`. Malformed brackets yield `None`.
fn split_indices(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(open) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };
    let key = &segment[..open];
    let mut rest = &segment[open..];
    let mut indices = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        indices.push(inner[..close].trim().parse().ok()?);
        rest = &inner[close + 1..];
    }
    Some((key, indices))
}
