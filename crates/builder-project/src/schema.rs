//! The top-level descriptor schema (§6).

use builder_deps::dependencies_section_schema;
use builder_schema::{AdditionalProperties, Schema};
use serde_json::Value;

pub fn project_descriptor_schema() -> Value {
    let info = Schema::object()
        .properties([
            ("name", Schema::string().pattern("[A-Za-z0-9_-]+")),
            ("title", Schema::string().min_length(1)),
            ("version", Schema::string().format("semver")),
            (
                "languages",
                Schema::one_of([
                    Schema::string().min_length(1),
                    Schema::array().items(Schema::string().min_length(1)),
                ]),
            ),
        ])
        .additional_properties(AdditionalProperties::Forbidden);

    Schema::object()
        .properties([
            ("info", info),
            ("dependencies", dependencies_section_schema()),
            ("vars", Schema::object().additional_properties(AdditionalProperties::Schema(Schema::string().min_length(1)))),
        ])
        .required(["info"])
        .build()
}
