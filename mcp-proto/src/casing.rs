//! Recursive camelCase <-> snake_case translation for JSON object keys.
//!
//! The wire format is camelCase (per the MCP/JSON-RPC convention); tool
//! handlers and internal types use snake_case. The dispatcher converts
//! at the boundary in both directions so neither side has to think
//! about the other's convention.

use serde_json::Value;

/// Converts every object key in `value` from camelCase to snake_case,
/// recursing into arrays and nested objects. Array elements and scalar
/// values are left untouched.
#[must_use]
pub fn to_snake_case(value: Value) -> Value {
    transform(value, camel_to_snake)
}

/// Converts every object key in `value` from snake_case to camelCase,
/// recursing into arrays and nested objects.
#[must_use]
pub fn to_camel_case(value: Value) -> Value {
    transform(value, snake_to_camel)
}

fn transform(value: Value, convert: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (convert(&key), transform(val, convert)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| transform(v, convert)).collect()),
        other => other,
    }
}

fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snake_case_round_trips_simple_keys() {
        assert_eq!(camel_to_snake("maxAmountRequired"), "max_amount_required");
        assert_eq!(snake_to_camel("max_amount_required"), "maxAmountRequired");
    }

    #[test]
    fn to_snake_case_recurses_into_nested_objects_and_arrays() {
        let input = json!({
            "toolName": "echo",
            "paymentInfo": { "txHash": "0xabc", "items": [{"unitPrice": 1}] }
        });
        let expected = json!({
            "tool_name": "echo",
            "payment_info": { "tx_hash": "0xabc", "items": [{"unit_price": 1}] }
        });
        assert_eq!(to_snake_case(input), expected);
    }

    #[test]
    fn to_camel_case_is_the_inverse_of_to_snake_case() {
        let original = json!({ "maxAmountRequired": "100", "payTo": "0xdead" });
        let round_tripped = to_camel_case(to_snake_case(original.clone()));
        assert_eq!(round_tripped, original);
    }

    #[test]
    fn scalars_and_arrays_of_scalars_pass_through_unchanged() {
        assert_eq!(to_snake_case(json!([1, "two", true, null])), json!([1, "two", true, null]));
    }
}
