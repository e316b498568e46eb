use serde_json::Value;

use super::format_number;

/// Price fields reported by `--output minimal`, in order.
const PRICE_KEYS: [&str; 2] = ["call_price", "put_price"];

/// Print just the key answer from the output.
///
/// One priced leg prints its bare value; two print as `key: value` lines.
/// Without prices (lattice output) the step count is printed.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{line}");
    }
}

fn minimal_lines(value: &Value) -> Vec<String> {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        return vec![format_minimal(result_obj)];
    };

    let prices: Vec<(&str, &Value)> = PRICE_KEYS
        .iter()
        .filter_map(|key| map.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
        .collect();

    match prices.as_slice() {
        [(_, only)] => vec![format_minimal(only)],
        [] => match map.get("steps").or_else(|| map.values().next()) {
            Some(v) => vec![format_minimal(v)],
            None => vec![],
        },
        many => many
            .iter()
            .map(|(key, v)| format!("{}: {}", key, format_minimal(v)))
            .collect(),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
