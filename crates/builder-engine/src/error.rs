use builder_core::BuilderError;

/// The component-local error this crate raises before widening into
/// `builder_core::BuilderError` at the `run()` boundary (§7).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Project(#[from] builder_project::ProjectError),

    #[error("{0}")]
    Registry(#[from] builder_registry::RegistryError),

    #[error("{0}")]
    Resolution(#[from] builder_resolve::ResolutionError),

    #[error("task {task} was given dependencies but its implementation does not accept them")]
    DependenciesNotAccepted { task: String },

    #[error("no tasks were specified")]
    NoTasksSpecified,

    #[error("the project requests languages with no registered backend")]
    UnknownLanguages,
}

impl From<EngineError> for BuilderError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::Resolution(source) => BuilderError::Resolution(source.to_string()),
            other => BuilderError::UserInput(other.to_string()),
        }
    }
}
