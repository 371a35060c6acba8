//! JSON Schema generation for tool argument records.

use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use serde_json::Value;

/// Remove keys that chat-completion APIs reject or ignore.
///
/// Drops `$schema`, `definitions`, `$ref`, and the root `title`.
pub fn sanitize_schema(value: &mut Value) {
    if let Value::Object(map) = value {
        map.remove("title");
    }
    strip_meta(value);
}

fn strip_meta(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("$schema");
            map.remove("definitions");
            map.remove("$ref");
            for (_, v) in map.iter_mut() {
                strip_meta(v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                strip_meta(v);
            }
        }
        _ => {}
    }
}

/// Generate the inlined, sanitized parameter schema for `T`.
pub fn parameters_schema<T: JsonSchema>() -> Value {
    let schema = SchemaSettings::draft07()
        .with(|s| s.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>();
    let mut value = serde_json::to_value(schema).unwrap_or_else(|_| Value::Object(Default::default()));
    sanitize_schema(&mut value);
    value
}
