// In crates/app-config/src/merge.rs

use serde_json::{Map, Value};

/// Deep-merges `overrides` onto `base` and returns the result.
///
/// Objects merge key by key, recursively. Every other value (arrays
/// included) in `overrides` replaces the base value wholesale. `base` is only
/// borrowed, so a single base configuration can back any number of batches.
pub fn deep_merge(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged = base_map.clone();
            for (key, override_value) in override_map {
                let value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, override_value),
                    None => override_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (_, other) => other.clone(),
    }
}

/// Writes `value` at the nested object `path`, creating (or replacing with)
/// objects along the way.
pub fn set_path(target: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *target = value;
        return;
    };
    let mut cursor = target;
    for key in parents {
        cursor = ensure_object(cursor)
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(cursor).insert(last.to_string(), value);
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}
