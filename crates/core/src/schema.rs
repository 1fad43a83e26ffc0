//! Argument validation against a tool's parameter schema.
//!
//! Covers the JSON Schema subset tools declare here: an object at the top
//! level, `required`, per-property `type` and `enum`, and
//! `additionalProperties: false`. Anything else in the schema is ignored.

use serde_json::Value;

/// Check `arguments` against `schema`. Returns a human-readable reason on mismatch.
pub fn validate(schema: &Value, arguments: &Value) -> Result<(), String> {
    // A tool without a schema accepts anything.
    if schema.is_null() {
        return Ok(());
    }

    if let Some(expected) = schema.get("type").and_then(Value::as_str)
        && !type_matches(expected, arguments)
    {
        return Err(format!(
            "expected arguments of type '{expected}', got {}",
            type_name(arguments)
        ));
    }

    let Some(args) = arguments.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !args.contains_key(field) {
                return Err(format!("missing required argument '{field}'"));
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);

    for (key, value) in args {
        let Some(prop) = properties.and_then(|p| p.get(key)) else {
            if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
                return Err(format!("unexpected argument '{key}'"));
            }
            continue;
        };

        if let Some(expected) = prop.get("type").and_then(Value::as_str)
            && !type_matches(expected, value)
        {
            return Err(format!(
                "argument '{key}' must be of type '{expected}', got {}",
                type_name(value)
            ));
        }

        if let Some(allowed) = prop.get("enum").and_then(Value::as_array)
            && !allowed.contains(value)
        {
            return Err(format!(
                "argument '{key}' must be one of {}",
                Value::Array(allowed.clone())
            ));
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": { "type": "string" },
                "units": { "type": "string", "enum": ["metric", "imperial"] },
                "days": { "type": "integer" }
            },
            "required": ["city"]
        })
    }

    #[test]
    fn accepts_valid_arguments() {
        let args = json!({"city": "Tokyo", "units": "metric", "days": 3});
        assert!(validate(&weather_schema(), &args).is_ok());
    }

    #[test]
    fn rejects_missing_required() {
        let err = validate(&weather_schema(), &json!({})).unwrap_err();
        assert!(err.contains("city"));
    }

    #[test]
    fn rejects_wrong_type() {
        let err = validate(&weather_schema(), &json!({"city": 42})).unwrap_err();
        assert!(err.contains("'city'"));
        assert!(err.contains("string"));
    }

    #[test]
    fn integer_rejects_fraction() {
        assert!(validate(&weather_schema(), &json!({"city": "Paris", "days": 1.5})).is_err());
    }

    #[test]
    fn rejects_value_outside_enum() {
        let err = validate(&weather_schema(), &json!({"city": "Paris", "units": "kelvin"}))
            .unwrap_err();
        assert!(err.contains("units"));
    }

    #[test]
    fn rejects_non_object_arguments() {
        let err = validate(&weather_schema(), &json!("Tokyo")).unwrap_err();
        assert!(err.contains("object"));
    }

    #[test]
    fn additional_properties_false() {
        let schema = json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        });
        assert!(validate(&schema, &json!({})).is_ok());
        assert!(validate(&schema, &json!({"x": 1})).is_err());
    }

    #[test]
    fn null_schema_accepts_anything() {
        assert!(validate(&Value::Null, &json!([1, 2, 3])).is_ok());
    }
}
