//! Variable substitution (§4.G): walks a descriptor's content tree replacing
//! every `${name}` in every string with the variable's current value.
//!
//! The original also special-cases tuples (converting them to lists in
//! place); JSON has no tuple type, so that case doesn't arise here — arrays
//! already behave like the original's post-conversion lists.

use builder_core::substitute_with;
use serde_json::{Map, Value};

/// Substitutes variables through every string reachable from `value`, using
/// `lookup` to resolve a name (unknown names substitute to the empty string).
pub fn substitute_vars(value: &mut Value, lookup: &impl Fn(&str) -> Option<String>) {
    match value {
        Value::String(text) => {
            *text = substitute_with(text, lookup);
        }
        Value::Array(items) => {
            for item in items {
                substitute_vars(item, lookup);
            }
        }
        Value::Object(fields) => {
            substitute_vars_in_map(fields, lookup);
        }
        _ => {}
    }
}

fn substitute_vars_in_map(fields: &mut Map<String, Value>, lookup: &impl Fn(&str) -> Option<String>) {
    for value in fields.values_mut() {
        substitute_vars(value, lookup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn substitutes_through_nested_lists_and_dicts() {
        let vars: HashMap<String, String> = [("v".to_string(), "1".to_string())].into_iter().collect();
        let lookup = |name: &str| vars.get(name).cloned();

        let mut value = json!({
            "a": "${v}",
            "b": ["${v} on ${v}", {"c": "${v}"}],
        });
        substitute_vars(&mut value, &lookup);

        assert_eq!(value["a"], json!("1"));
        assert_eq!(value["b"][0], json!("1 on 1"));
        assert_eq!(value["b"][1]["c"], json!("1"));
    }

    #[test]
    fn unknown_variable_substitutes_to_empty_string() {
        let lookup = |_: &str| None;
        let mut value = json!("${missing}");
        substitute_vars(&mut value, &lookup);
        assert_eq!(value, json!(""));
    }
}
