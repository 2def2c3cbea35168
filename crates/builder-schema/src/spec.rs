//! A small fluent builder for schema trees, mirroring the original's
//! `Schema`/`StringSchema`/`ObjectSchema`/... class hierarchy but expressed in
//! Rust's consuming-builder idiom (each method takes and returns `Self`)
//! instead of Python's keyword-argument constructors.

use serde_json::{json, Map, Value};

/// A schema under construction. `build()` consumes it into the `serde_json::Value`
/// tree `SchemaValidator` understands.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    spec: Map<String, Value>,
}

impl Schema {
    fn of_type(type_name: &str) -> Self {
        let mut spec = Map::new();
        spec.insert("type".to_string(), json!(type_name));
        Self { spec }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn object() -> Self {
        Self::of_type("object")
    }

    pub fn array() -> Self {
        Self::of_type("array")
    }

    pub fn string() -> Self {
        Self::of_type("string")
    }

    pub fn integer() -> Self {
        Self::of_type("integer")
    }

    pub fn number() -> Self {
        Self::of_type("number")
    }

    pub fn boolean() -> Self {
        Self::of_type("boolean")
    }

    pub fn null() -> Self {
        let mut spec = Map::new();
        spec.insert("type".to_string(), json!("null"));
        Self { spec }
    }

    pub fn one_of(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self::combiner("oneOf", schemas)
    }

    pub fn any_of(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self::combiner("anyOf", schemas)
    }

    pub fn all_of(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self::combiner("allOf", schemas)
    }

    fn combiner(tag: &str, schemas: impl IntoIterator<Item = Schema>) -> Self {
        let values: Vec<Value> = schemas.into_iter().map(Schema::build).collect();
        let mut spec = Map::new();
        spec.insert(tag.to_string(), Value::Array(values));
        Self { spec }
    }

    pub fn not(schema: Schema) -> Self {
        let mut spec = Map::new();
        spec.insert("not".to_string(), schema.build());
        Self { spec }
    }

    pub fn reference(pointer: impl Into<String>) -> Self {
        let mut spec = Map::new();
        spec.insert("$ref".to_string(), json!(pointer.into()));
        Self { spec }
    }

    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.spec.insert(key.to_string(), value);
        self
    }

    // ---- string ----
    pub fn min_length(self, value: usize) -> Self {
        self.set("minLength", json!(value))
    }

    pub fn max_length(self, value: usize) -> Self {
        self.set("maxLength", json!(value))
    }

    pub fn pattern(self, value: &str) -> Self {
        self.set("pattern", json!(value))
    }

    pub fn format(self, value: &str) -> Self {
        self.set("format", json!(value))
    }

    pub fn enum_values<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.set("enum", Value::Array(values))
    }

    pub fn const_value(self, value: Value) -> Self {
        self.set("const", value)
    }

    pub fn default_value(self, value: Value) -> Self {
        self.set("default", value)
    }

    // ---- number ----
    pub fn minimum(self, value: f64) -> Self {
        self.set("minimum", json!(value))
    }

    pub fn maximum(self, value: f64) -> Self {
        self.set("maximum", json!(value))
    }

    pub fn exclusive_minimum(self, value: Value) -> Self {
        self.set("exclusiveMinimum", value)
    }

    pub fn exclusive_maximum(self, value: Value) -> Self {
        self.set("exclusiveMaximum", value)
    }

    pub fn multiple_of(self, value: f64) -> Self {
        self.set("multipleOf", json!(value))
    }

    // ---- object ----
    pub fn properties(self, entries: impl IntoIterator<Item = (&'static str, Schema)>) -> Self {
        let mut properties = Map::new();
        for (name, schema) in entries {
            properties.insert(name.to_string(), schema.build());
        }
        self.set("properties", Value::Object(properties))
    }

    pub fn required(self, names: impl IntoIterator<Item = &'static str>) -> Self {
        let names: Vec<Value> = names.into_iter().map(|n| json!(n)).collect();
        self.set("required", Value::Array(names))
    }

    pub fn additional_properties(self, value: AdditionalProperties) -> Self {
        self.set("additionalProperties", value.into_value())
    }

    pub fn pattern_properties(self, entries: impl IntoIterator<Item = (&'static str, Schema)>) -> Self {
        let mut properties = Map::new();
        for (pattern, schema) in entries {
            properties.insert(pattern.to_string(), schema.build());
        }
        self.set("patternProperties", Value::Object(properties))
    }

    pub fn min_properties(self, value: usize) -> Self {
        self.set("minProperties", json!(value))
    }

    pub fn max_properties(self, value: usize) -> Self {
        self.set("maxProperties", json!(value))
    }

    // ---- array ----
    pub fn items(self, schema: Schema) -> Self {
        self.set("items", schema.build())
    }

    pub fn items_tuple(self, schemas: impl IntoIterator<Item = Schema>) -> Self {
        let values: Vec<Value> = schemas.into_iter().map(Schema::build).collect();
        self.set("items", Value::Array(values))
    }

    pub fn min_items(self, value: usize) -> Self {
        self.set("minItems", json!(value))
    }

    pub fn max_items(self, value: usize) -> Self {
        self.set("maxItems", json!(value))
    }

    pub fn unique_items(self, value: bool) -> Self {
        self.set("uniqueItems", json!(value))
    }

    pub fn build(self) -> Value {
        Value::Object(self.spec)
    }
}

/// The three shapes `additionalProperties`/`additionalItems` can take.
pub enum AdditionalProperties {
    Allowed,
    Forbidden,
    Schema(Schema),
}

impl AdditionalProperties {
    fn into_value(self) -> Value {
        match self {
            AdditionalProperties::Allowed => json!(true),
            AdditionalProperties::Forbidden => json!(false),
            AdditionalProperties::Schema(schema) => schema.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_object_schema_tree() {
        let schema = Schema::object()
            .properties([("name", Schema::string().min_length(1))])
            .required(["name"])
            .additional_properties(AdditionalProperties::Forbidden)
            .build();

        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["additionalProperties"], json!(false));
    }
}
