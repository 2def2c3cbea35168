#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
    #[error("cannot make the {key} dependency from the specification, \"{spec}\"")]
    BadSpec { key: String, spec: String },

    #[error("a dependency cannot have a location of {0}")]
    BadLocation(String),

    #[error("the version, \"{version}\", is not a valid version for the {key} dependency")]
    BadVersion { key: String, version: String },

    #[error("the {key} dependency is missing its \"{field}\" field")]
    MissingField { key: String, field: &'static str },
}
