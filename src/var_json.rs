//! Purpose: JSON envelopes printed by the `typenv` CLI.
//! Exports: `var_json` and `kinds_json`.
//! Role: Keep output shapes in one place so commands and tests agree.
//! Invariants: Stable key names; `value` is a string, or an array of strings for lists.

use serde_json::{Map, Value, json};
use typenv::ValueKind;

pub(crate) fn var_json(name: &str, kind: ValueKind, present: bool, value: Value) -> Value {
    let mut map = Map::new();
    map.insert("name".to_string(), json!(name));
    map.insert("kind".to_string(), json!(kind.as_str()));
    map.insert("present".to_string(), json!(present));
    map.insert("value".to_string(), value);
    Value::Object(map)
}

pub(crate) fn kinds_json() -> Value {
    let kinds = ValueKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "name": kind.as_str(),
                "zero": kind.zero_text(),
            })
        })
        .collect::<Vec<_>>();
    json!({ "kinds": kinds })
}

#[cfg(test)]
mod tests {
    use super::{kinds_json, var_json};
    use serde_json::json;
    use typenv::ValueKind;

    #[test]
    fn var_json_has_required_fields() {
        let value = var_json("PORT", ValueKind::U16, true, json!("8080"));
        assert_eq!(value["name"], "PORT");
        assert_eq!(value["kind"], "u16");
        assert_eq!(value["present"], true);
        assert_eq!(value["value"], "8080");
    }

    #[test]
    fn kinds_json_covers_every_kind() {
        let value = kinds_json();
        let kinds = value["kinds"].as_array().expect("kinds array");
        assert_eq!(kinds.len(), ValueKind::ALL.len());
        assert_eq!(kinds[0]["name"], "i8");
        assert_eq!(kinds[0]["zero"], "0");
    }
}
