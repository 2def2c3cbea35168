//! The descriptor-level schema for a single entry under `dependencies` (§6).

use builder_schema::{AdditionalProperties, Schema};

fn scope_schema() -> Schema {
    Schema::one_of([
        Schema::string().min_length(1),
        Schema::array().items(Schema::string().min_length(1)).min_items(1),
    ])
}

/// The long form: explicit `location`/`group`/`name`/`version` fields.
fn long_form() -> Schema {
    Schema::object()
        .properties([
            ("location", Schema::string().enum_values(["remote", "local", "project"])),
            ("group", Schema::string().min_length(1)),
            ("name", Schema::string().min_length(1)),
            ("classifier", Schema::string().min_length(1)),
            ("ignore_transients", Schema::boolean()),
            ("version", Schema::string().min_length(1)),
            ("scope", scope_schema()),
        ])
        .required(["location", "version", "scope"])
        .additional_properties(AdditionalProperties::Forbidden)
}

/// The short form: a single `location:[group:]name:version` spec string.
fn short_form() -> Schema {
    Schema::object()
        .properties([
            ("spec", Schema::string().min_length(1)),
            ("classifier", Schema::string().min_length(1)),
            ("ignore_transients", Schema::boolean()),
            ("scope", scope_schema()),
        ])
        .required(["spec", "scope"])
        .additional_properties(AdditionalProperties::Forbidden)
}

pub fn dependency_schema() -> Schema {
    Schema::one_of([long_form(), short_form()])
}

pub fn dependencies_section_schema() -> Schema {
    Schema::object()
        .pattern_properties([(r"^.+$", dependency_schema())])
        .additional_properties(AdditionalProperties::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use builder_schema::SchemaValidator;
    use serde_json::json;

    #[test]
    fn accepts_long_and_short_forms() {
        let schema = dependencies_section_schema().build();
        let mut validator = SchemaValidator::new(schema);
        let value = json!({
            "alpha": {"spec": "remote:1.2.3", "scope": "compile"},
            "beta": {"location": "local", "group": "g", "name": "n", "version": "1.0.0", "scope": ["compile"]},
        });
        assert!(validator.validate(&value, ""));
    }

    #[test]
    fn rejects_unknown_field() {
        let schema = dependencies_section_schema().build();
        let mut validator = SchemaValidator::new(schema);
        let value = json!({"alpha": {"spec": "remote:1.2.3", "scope": "compile", "bogus": true}});
        assert!(!validator.validate(&value, ""));
    }
}
