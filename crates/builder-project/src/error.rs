#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse {path}: {source}")]
    Yaml {
        path: std::path::PathBuf,
        source: serde_yaml::Error,
    },

    #[error("bad project file format: {0}")]
    InvalidDescriptor(String),

    #[error("invalid dependency declaration: {0}")]
    InvalidDependencies(#[from] builder_deps::DependencyError),

    #[error("configuration for \"{name}\" is not valid: {message}")]
    InvalidConfig { name: String, message: String },

    #[error("could not interpret configuration for \"{0}\": {1}")]
    ConfigShape(String, serde_json::Error),

    #[error("required directory, {0}, does not exist or is not a directory")]
    RequiredDirMissing(std::path::PathBuf),

    #[error("there is no project named \"{0}\"")]
    UnknownProject(String),
}
