//! The schema validator (§4.A): a recursive tree-walking evaluator dispatched
//! on a closed set of constraint kinds, one arm per tag, per §9's design note.

use crate::error::SchemaError;
use crate::formats::{default_formats, FormatFn};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// `url -> parsed document`, the schema fetcher injection point named in §4.A.
pub type SchemaFetcher = Arc<dyn Fn(&str) -> Result<Value, SchemaError> + Send + Sync>;

/// Wraps a schema tree and validates values against it. `error` is set after
/// every `validate` call (`None` on success).
pub struct SchemaValidator {
    schema: Value,
    formats: HashMap<String, FormatFn>,
    /// Extension sub-schemas applied, on success, to a property keyed either by
    /// its path or its bare name (§4.A: "a matching extension validator...").
    /// Only the schema tree is kept; an extension's own error state is never
    /// consulted by the outer validator, so there is nothing to gain from
    /// storing a full nested `SchemaValidator`.
    extensions: HashMap<String, Value>,
    ref_cache: HashMap<String, Value>,
    fetcher: SchemaFetcher,
    pub error: Option<String>,
}

impl SchemaValidator {
    pub fn new(schema: Value) -> Self {
        Self {
            schema,
            formats: default_formats(),
            extensions: HashMap::new(),
            ref_cache: HashMap::new(),
            fetcher: Arc::new(default_http_fetch),
            error: None,
        }
    }

    pub fn with_fetcher(schema: Value, fetcher: SchemaFetcher) -> Self {
        Self {
            fetcher,
            ..Self::new(schema)
        }
    }

    pub fn add_extension(&mut self, name: impl Into<String>, schema: Value) {
        self.extensions.insert(name.into(), schema);
    }

    pub fn add_format(&mut self, name: impl Into<String>, check: FormatFn) {
        self.formats.insert(name.into(), check);
    }

    /// Validates `value` at `path` (a `/`-separated property path, empty for the
    /// root). Returns whether it conformed; on failure `self.error` carries a
    /// message citing the failing constraint and a `#/...` pointer.
    pub fn validate(&mut self, value: &Value, path: &str) -> bool {
        let full_path = if path.is_empty() {
            "#".to_string()
        } else {
            format!("#/{path}")
        };
        let schema = self.schema.clone();
        self.error = self.eval(value, &schema, &full_path);
        self.error.is_none()
    }

    fn eval(&mut self, value: &Value, schema: &Value, path: &str) -> Option<String> {
        let object = schema.as_object()?;

        macro_rules! fail {
            ($key:expr, $msg:expr) => {{
                let msg: String = $msg;
                return Some(self.format_error($key, &msg, path));
            }};
        }

        if let Some(constraint) = object.get("type") {
            if let Some(msg) = self.check_type(value, constraint) {
                fail!("type", msg);
            }
        }
        if let Some(constraint) = object.get("enum") {
            if let Some(msg) = check_enum(value, constraint) {
                fail!("enum", msg);
            }
        }
        if let Some(constraint) = object.get("const") {
            if value != constraint {
                fail!("const", format!("the value {value} is not {constraint}."));
            }
        }
        if let Some(constraint) = object.get("minLength") {
            if let (Some(s), Some(min)) = (value.as_str(), constraint.as_u64()) {
                if (s.chars().count() as u64) < min {
                    fail!("minLength", format!("the string is shorter than {min}."));
                }
            }
        }
        if let Some(constraint) = object.get("maxLength") {
            if let (Some(s), Some(max)) = (value.as_str(), constraint.as_u64()) {
                if (s.chars().count() as u64) > max {
                    fail!("maxLength", format!("the string is longer than {max}."));
                }
            }
        }
        if let Some(constraint) = object.get("pattern") {
            if let (Some(s), Some(pattern)) = (value.as_str(), constraint.as_str()) {
                // `Regex::is_match` searches anywhere in the string; a full-string
                // match is required here so e.g. `[A-Za-z0-9_-]+` rejects "a/b"
                // instead of matching the leading "a".
                match Regex::new(&format!("^(?:{pattern})$")) {
                    Ok(re) if re.is_match(s) => {}
                    Ok(_) => fail!(
                        "pattern",
                        format!("it does not match the '{pattern}' pattern.")
                    ),
                    Err(_) => fail!(
                        "pattern",
                        format!("it does not match the '{pattern}' pattern.")
                    ),
                }
            }
        }
        if let Some(constraint) = object.get("format") {
            if let Some(name) = constraint.as_str() {
                if let (Some(s), Some(check)) = (value.as_str(), self.formats.get(name)) {
                    if !check(s) {
                        fail!("format", format!("it does not follow the {name} format."));
                    }
                }
            }
        }
        if let Some(constraint) = object.get("multipleOf") {
            if let (Some(v), Some(m)) = (value.as_f64(), constraint.as_f64()) {
                if m != 0.0 && (v / m).fract().abs() > 1e-9 {
                    fail!("multipleOf", format!("{v} is not a multiple of {m}."));
                }
            }
        }
        if let Some(constraint) = object.get("minimum") {
            if let (Some(v), Some(min)) = (value.as_f64(), constraint.as_f64()) {
                let exclusive = object
                    .get("exclusiveMinimum")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let failed = if exclusive { v < min } else { v <= min };
                if failed {
                    let verb = if exclusive { "less than" } else { "less than or equal to" };
                    fail!("minimum", format!("{v} is {verb} {min}."));
                }
            }
        }
        if let Some(constraint) = object.get("exclusiveMinimum") {
            if !constraint.is_boolean() {
                if let (Some(v), Some(min)) = (value.as_f64(), constraint.as_f64()) {
                    if v < min {
                        fail!("exclusiveMinimum", format!("{v} is less than {min}."));
                    }
                }
            }
        }
        if let Some(constraint) = object.get("maximum") {
            if let (Some(v), Some(max)) = (value.as_f64(), constraint.as_f64()) {
                let exclusive = object
                    .get("exclusiveMaximum")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let failed = if exclusive { v > max } else { v >= max };
                if failed {
                    let verb = if exclusive { "greater than" } else { "greater than or equal to" };
                    fail!("maximum", format!("{v} is {verb} {max}."));
                }
            }
        }
        if let Some(constraint) = object.get("exclusiveMaximum") {
            if !constraint.is_boolean() {
                if let (Some(v), Some(max)) = (value.as_f64(), constraint.as_f64()) {
                    if v > max {
                        fail!("exclusiveMaximum", format!("{v} is greater than {max}."));
                    }
                }
            }
        }

        if object.contains_key("properties")
            || object.contains_key("patternProperties")
            || object.contains_key("additionalProperties")
        {
            let empty = Map::new();
            let properties = object.get("properties").and_then(Value::as_object).unwrap_or(&empty);
            let pattern_properties = object
                .get("patternProperties")
                .and_then(Value::as_object)
                .unwrap_or(&empty);
            let additional = get_additional(object, "additionalProperties");
            if let Some(msg) = self.check_properties(value, properties, pattern_properties, additional, path) {
                return Some(msg);
            }
        }
        if let Some(constraint) = object.get("required").and_then(Value::as_array) {
            if let Some(obj) = value.as_object() {
                for name in constraint {
                    if let Some(name) = name.as_str() {
                        if !obj.contains_key(name) {
                            fail!("required", format!("it is missing the {name} property."));
                        }
                    }
                }
            }
        }
        if let Some(constraint) = object.get("propertyNames") {
            if let Some(obj) = value.as_object() {
                for name in obj.keys() {
                    let child_path = format!("{path}/{name}");
                    if let Some(msg) = self.eval(&Value::String(name.clone()), constraint, &child_path) {
                        return Some(msg);
                    }
                }
            }
        }
        if let Some(constraint) = object.get("minProperties").and_then(Value::as_u64) {
            if let Some(obj) = value.as_object() {
                if (obj.len() as u64) < constraint {
                    let noun = if constraint == 1 { "property" } else { "properties" };
                    fail!(
                        "minProperties",
                        format!("the object needs at least {constraint} {noun}.")
                    );
                }
            }
        }
        if let Some(constraint) = object.get("maxProperties").and_then(Value::as_u64) {
            if let Some(obj) = value.as_object() {
                if (obj.len() as u64) > constraint {
                    let noun = if constraint == 1 { "property" } else { "properties" };
                    fail!(
                        "maxProperties",
                        format!("the object can have no more than {constraint} {noun}.")
                    );
                }
            }
        }
        if let Some(constraint) = object.get("dependencies").and_then(Value::as_object) {
            if let Some(obj) = value.as_object() {
                for (name, child_constraint) in constraint {
                    if !obj.contains_key(name) {
                        continue;
                    }
                    if let Some(required) = child_constraint.as_array() {
                        for req in required {
                            if let Some(req) = req.as_str() {
                                if !obj.contains_key(req) {
                                    fail!(
                                        "dependencies",
                                        format!(
                                            "the {name} property requires the {req} property but it is missing."
                                        )
                                    );
                                }
                            }
                        }
                    } else if child_constraint.is_object() {
                        if let Some(msg) = self.eval(value, child_constraint, path) {
                            return Some(msg);
                        }
                    }
                }
            }
        }

        if object.contains_key("items") || object.contains_key("additionalItems") {
            if let Some(msg) = self.check_items(value, object, path) {
                return Some(msg);
            }
        }
        if let Some(constraint) = object.get("contains") {
            if let Some(arr) = value.as_array() {
                if constraint.is_object() {
                    let mut found = false;
                    for (index, item) in arr.iter().enumerate() {
                        if self.eval(item, constraint, &format!("{path}[{index}]")).is_none() {
                            found = true;
                            break;
                        }
                    }
                    if !found {
                        fail!(
                            "contains",
                            "the array does not contain any item that satisfies the contains schema."
                                .to_string()
                        );
                    }
                }
            }
        }
        if let Some(constraint) = object.get("minItems").and_then(Value::as_u64) {
            if let Some(arr) = value.as_array() {
                if (arr.len() as u64) < constraint {
                    let noun = if constraint == 1 { "item" } else { "items" };
                    fail!("minItems", format!("the array needs at least {constraint} {noun}."));
                }
            }
        }
        if let Some(constraint) = object.get("maxItems").and_then(Value::as_u64) {
            if let Some(arr) = value.as_array() {
                if (arr.len() as u64) > constraint {
                    let noun = if constraint == 1 { "item" } else { "items" };
                    fail!(
                        "maxItems",
                        format!("the array can have no more than {constraint} {noun}.")
                    );
                }
            }
        }
        if let Some(true) = object.get("uniqueItems").and_then(Value::as_bool) {
            if let Some(arr) = value.as_array() {
                for outer in 0..arr.len().saturating_sub(1) {
                    for inner in (outer + 1)..arr.len() {
                        if arr[outer] == arr[inner] {
                            fail!(
                                "uniqueItems",
                                format!("entry {outer} is the same as entry {inner}.")
                            );
                        }
                    }
                }
            }
        }

        if let Some(constraint) = object.get("allOf").and_then(Value::as_array) {
            for (index, sub) in constraint.iter().enumerate() {
                if let Some(error) = self.eval(value, sub, path) {
                    let root = if path == "#" { "#/".to_string() } else { path.to_string() };
                    let inner = strip_violation_prefix(&error);
                    return Some(format!(
                        "{root} violates schema #{} in the 'allOf' constraint: {inner}",
                        index + 1
                    ));
                }
            }
        }
        if let Some(constraint) = object.get("anyOf").and_then(Value::as_array) {
            let mut errors = Vec::new();
            let mut matched = false;
            for sub in constraint {
                match self.eval(value, sub, path) {
                    None => {
                        matched = true;
                        break;
                    }
                    Some(error) => errors.push(error),
                }
            }
            if !matched {
                return Some(self.format_error(
                    "anyOf",
                    &format_combiner_children(&errors),
                    path,
                ));
            }
        }
        if let Some(constraint) = object.get("oneOf").and_then(Value::as_array) {
            let mut first: Option<usize> = None;
            let mut errors = Vec::new();
            for (index, sub) in constraint.iter().enumerate() {
                match self.eval(value, sub, path) {
                    None => {
                        if let Some(first_index) = first {
                            return Some(format!(
                                "the value was accepted by schemas {first_index} and {index}."
                            ));
                        }
                        first = Some(index);
                    }
                    Some(error) => errors.push(error),
                }
            }
            if first.is_none() {
                return Some(self.format_error(
                    "oneOf",
                    &format_combiner_children(&errors),
                    path,
                ));
            }
        }
        if let Some(constraint) = object.get("not") {
            if constraint.is_object() && self.eval(value, constraint, path).is_none() {
                fail!("not", "the value was accepted by the child schema.".to_string());
            }
        }

        if let Some(constraint) = object.get("if") {
            if constraint.is_object() {
                let branch_key = if self.eval(value, constraint, path).is_none() {
                    "then"
                } else {
                    "else"
                };
                if let Some(branch) = object.get(branch_key) {
                    if branch.is_object() {
                        if let Some(msg) = self.eval(value, branch, path) {
                            return Some(msg);
                        }
                    }
                }
            }
        }

        if let Some(constraint) = object.get("$ref") {
            if let Some(pointer) = constraint.as_str() {
                match self.resolve_ref(pointer) {
                    Ok(RefTarget::Missing) => fail!(
                        "$ref",
                        format!("the reference, '{pointer}', does not refer to anything.")
                    ),
                    Ok(RefTarget::NotASchema) => fail!(
                        "$ref",
                        format!("the reference, '{pointer}', does not refer to a schema.")
                    ),
                    Ok(RefTarget::Found(sub_schema)) => {
                        if let Some(msg) = self.eval(value, &sub_schema, path) {
                            return Some(msg);
                        }
                    }
                    Err(err) => fail!("$ref", err.to_string()),
                }
            }
        }

        None
    }

    fn format_error(&self, key: &str, message: &str, path: &str) -> String {
        if message.contains(" constraint: ") {
            return message.to_string();
        }
        let root = if path == "#" { "#/" } else { path };
        format!("{root} violates the \"{key}\" constraint: {message}")
    }

    fn check_type(&self, value: &Value, constraint: &Value) -> Option<String> {
        if let Some(list) = constraint.as_array() {
            for possible in list {
                if self.check_type(value, possible).is_none() {
                    return None;
                }
            }
            return Some(format!("it is not one of {constraint}"));
        }
        let name = constraint.as_str().unwrap_or("null");
        let ok = match name {
            "object" => value.is_object(),
            "array" => value.is_array(),
            "string" => value.is_string(),
            "integer" => value.is_i64() || value.is_u64(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "null" => value.is_null(),
            _ => true,
        };
        if ok {
            None
        } else {
            Some(match name {
                "object" => "it is not an object.".to_string(),
                "array" => "it is not an array.".to_string(),
                "string" => "it is not a string.".to_string(),
                "integer" => "it is not an integer.".to_string(),
                "number" => "it is not a number.".to_string(),
                "boolean" => "it is not a boolean.".to_string(),
                _ => "it is not null.".to_string(),
            })
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn check_properties(
        &mut self,
        value: &Value,
        specific: &Map<String, Value>,
        patterns: &Map<String, Value>,
        additional: Option<Value>,
        path: &str,
    ) -> Option<String> {
        let object = value.as_object()?;

        for (name, child) in object {
            let child_path = format!("{path}/{name}");
            let mut schema = specific.get(name).cloned();
            if schema.is_none() {
                for (pattern, sub) in patterns {
                    if Regex::new(pattern).map(|re| re.is_match(name)).unwrap_or(false) {
                        schema = Some(sub.clone());
                        break;
                    }
                }
            }
            let schema = schema.or_else(|| additional.clone());

            let Some(schema) = schema else {
                return Some(format!("the {name} property is not allowed here."));
            };

            if let Some(error) = self.eval(child, &schema, &child_path) {
                return Some(error);
            }

            let extension = self
                .extensions
                .get(path)
                .or_else(|| self.extensions.get(name.as_str()))
                .cloned();
            if let Some(extension) = extension {
                if let Some(error) = self.eval(child, &extension, &child_path) {
                    return Some(error);
                }
            }
        }

        None
    }

    fn check_items(&mut self, value: &Value, schema: &Map<String, Value>, path: &str) -> Option<String> {
        let Some(array) = value.as_array() else {
            return None;
        };
        let additional = get_additional(schema, "additionalItems");

        match schema.get("items") {
            Some(items) if items.is_object() => {
                for (index, item) in array.iter().enumerate() {
                    if let Some(error) = self.eval(item, items, &format!("{path}[{index}]")) {
                        return Some(error);
                    }
                }
                None
            }
            Some(items) if items.is_array() => {
                let tuple = items.as_array().unwrap();
                for (index, item) in array.iter().enumerate() {
                    let item_schema = tuple.get(index).cloned().or_else(|| additional.clone());
                    let Some(item_schema) = item_schema else {
                        return Some(format!("entry {index} in the array is not allowed here."));
                    };
                    if let Some(error) = self.eval(item, &item_schema, &format!("{path}[{index}]")) {
                        return Some(error);
                    }
                }
                None
            }
            _ => {
                // No `items`: every entry is checked against `additionalItems` (or skipped
                // entirely if that's also absent), per the original's `[]`-constraint fallback.
                let Some(additional) = additional else {
                    return None;
                };
                for (index, item) in array.iter().enumerate() {
                    if let Some(error) = self.eval(item, &additional, &format!("{path}[{index}]")) {
                        return Some(error);
                    }
                }
                None
            }
        }
    }

    fn resolve_ref(&mut self, pointer: &str) -> Result<RefTarget, SchemaError> {
        let (url, fragment) = split_fragment(pointer);

        let document = if url.is_empty() {
            self.schema.clone()
        } else if let Some(cached) = self.ref_cache.get(url) {
            cached.clone()
        } else {
            let mut document = (self.fetcher)(url)?;
            qualify_refs(&mut document, url);
            self.ref_cache.insert(url.to_string(), document.clone());
            document
        };

        match builder_core::find_value(&document, fragment) {
            None => Ok(RefTarget::Missing),
            Some(found) if !found.is_object() => Ok(RefTarget::NotASchema),
            Some(found) => Ok(RefTarget::Found(found.clone())),
        }
    }
}

enum RefTarget {
    Missing,
    NotASchema,
    Found(Value),
}

fn get_additional(object: &Map<String, Value>, key: &str) -> Option<Value> {
    match object.get(key) {
        None => Some(Value::Object(Map::new())),
        Some(Value::Bool(true)) => Some(Value::Object(Map::new())),
        Some(Value::Bool(false)) => None,
        Some(other) => Some(other.clone()),
    }
}

fn check_enum(value: &Value, constraint: &Value) -> Option<String> {
    let Some(list) = constraint.as_array() else {
        return None;
    };

    let matches = list.iter().any(|candidate| {
        candidate == value
            // Open question (preserved): `null` and the literal string "null" are
            // mutually accepted inside an `enum`.
            || (value.is_null() && candidate.as_str() == Some("null"))
            || (value.as_str() == Some("null") && candidate.is_null())
    });

    if matches {
        None
    } else {
        let rendered: Vec<String> = list.iter().map(|v| v.to_string()).collect();
        Some(format!("it is not one of [{}].", rendered.join(", ")))
    }
}

fn format_combiner_children(errors: &[String]) -> String {
    let joined: String = errors.iter().map(|e| format!("\n    {e}")).collect();
    format!("the value was not accepted by any of the child schemas:{joined}")
}

fn strip_violation_prefix(error: &str) -> String {
    if let Some(violates_at) = error.find(" violates ") {
        if let Some(colon_at) = error.find(": ") {
            if violates_at < colon_at {
                return error[colon_at + 2..].to_string();
            }
        }
    }
    error.to_string()
}

fn split_fragment(pointer: &str) -> (&str, &str) {
    match pointer.split_once('#') {
        Some((url, fragment)) => (url, fragment),
        None => (pointer, ""),
    }
}

fn qualify_refs(value: &mut Value, url: &str) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get_mut("$ref") {
                if reference.starts_with('#') {
                    *reference = format!("{url}{reference}");
                }
            }
            for (key, child) in map.iter_mut() {
                if key != "$ref" {
                    qualify_refs(child, url);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                qualify_refs(item, url);
            }
        }
        _ => {}
    }
}

fn default_http_fetch(url: &str) -> Result<Value, SchemaError> {
    let body = ureq::get(url)
        .call()
        .map_err(Box::new)?
        .into_string()
        .map_err(SchemaError::Io)?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_constraint_roundtrip() {
        let mut v = SchemaValidator::new(json!({"type": "string"}));
        assert!(v.validate(&json!("hi"), ""));
        assert!(!v.validate(&json!(1), ""));
        assert!(v.error.as_ref().unwrap().contains("type"));
        assert!(v.error.as_ref().unwrap().starts_with("#/"));
    }

    #[test]
    fn pattern_path_is_json_pointer_style() {
        let schema = json!({
            "type": "object",
            "properties": { "name": { "type": "string", "pattern": "^[a-zA-Z0-9-_]+$" } }
        });
        let mut v = SchemaValidator::new(schema);
        assert!(!v.validate(&json!({"name": "a/b"}), ""));
        let error = v.error.unwrap();
        assert!(error.contains("#/name"));
        assert!(error.contains("pattern"));
    }

    #[test]
    fn enum_accepts_null_and_literal_null_interchangeably() {
        let mut v = SchemaValidator::new(json!({"enum": [Value::Null]}));
        assert!(v.validate(&json!("null"), ""));
        let mut v2 = SchemaValidator::new(json!({"enum": ["null"]}));
        assert!(v2.validate(&Value::Null, ""));
    }

    #[test]
    fn minimum_is_exclusive_unless_explicitly_marked_false() {
        let mut v = SchemaValidator::new(json!({"minimum": 1}));
        assert!(!v.validate(&json!(1), ""));
        let mut v2 = SchemaValidator::new(json!({"minimum": 1, "exclusiveMinimum": false}));
        assert!(v2.validate(&json!(1), ""));
    }

    #[test]
    fn all_of_reports_failing_index() {
        let schema = json!({"allOf": [{"type": "string"}, {"minLength": 5}]});
        let mut v = SchemaValidator::new(schema);
        assert!(!v.validate(&json!("ab"), ""));
        assert!(v.error.unwrap().contains("#1"));
    }

    #[test]
    fn one_of_rejects_when_multiple_match() {
        let schema = json!({"oneOf": [{"type": "string"}, {"minLength": 1}]});
        let mut v = SchemaValidator::new(schema);
        assert!(!v.validate(&json!("ab"), ""));
    }

    #[test]
    fn intra_document_ref_resolves_without_network() {
        let schema = json!({
            "definitions": {"pos": {"type": "integer", "minimum": 0, "exclusiveMinimum": false}},
            "$ref": "#/definitions/pos"
        });
        let mut v = SchemaValidator::new(schema);
        assert!(v.validate(&json!(0), ""));
        assert!(!v.validate(&json!(-1), ""));
    }

    #[test]
    fn additional_properties_false_rejects_unknown_keys() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "additionalProperties": false
        });
        let mut v = SchemaValidator::new(schema);
        assert!(v.validate(&json!({"a": "x"}), ""));
        assert!(!v.validate(&json!({"a": "x", "b": 1}), ""));
    }

    #[test]
    fn required_reports_missing_property() {
        let schema = json!({"type": "object", "required": ["name"]});
        let mut v = SchemaValidator::new(schema);
        assert!(!v.validate(&json!({}), ""));
        assert!(v.error.unwrap().contains("required"));
    }
}
