use crate::attr::{Attr, Value};
use chrono::SecondsFormat;
use serde_json::{Map, Value as JsonValue, json};

/// Map a top-level attribute list to a JSON object.
///
/// Keys keep their first-seen order. Sibling groups sharing a key are merged
/// recursively. A repeated top-level key that is not a group merge keeps its
/// first value; inside merged groups the later value wins.
pub fn attrs_to_json(attrs: &[Attr]) -> Map<String, JsonValue> {
    let mut out = Map::new();
    for attr in attrs {
        merge_into(&mut out, &attr.key, value_to_json(&attr.value), true);
    }
    out
}

/// Durations become integer nanoseconds, times RFC 3339 strings, and values
/// JSON cannot hold (empty values, non-finite floats) become `null`.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Empty => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::Uint(u) => JsonValue::from(*u),
        Value::Float(x) => serde_json::Number::from_f64(*x)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Duration(d) => JsonValue::from(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
        Value::Time(t) => JsonValue::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Value::Source(src) => json!({
            "file": src.file,
            "line": src.line,
            "column": src.column,
        }),
        Value::Lazy(lazy) => value_to_json(&lazy.log_value().resolve()),
        Value::Group(attrs) => JsonValue::Object(attrs_to_json(attrs)),
    }
}

fn merge_into(out: &mut Map<String, JsonValue>, key: &str, next: JsonValue, top: bool) {
    let Some(slot) = out.get_mut(key) else {
        out.insert(key.to_string(), next);
        return;
    };
    match (slot, next) {
        (JsonValue::Object(prev), JsonValue::Object(next)) => {
            for (k, v) in next {
                merge_into(prev, &k, v, false);
            }
        }
        (slot, next) => {
            if !top {
                *slot = next;
            }
        }
    }
}
