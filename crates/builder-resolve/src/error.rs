#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("the {tag} language has no resolver registered")]
    NoResolver { tag: String },

    #[error(
        "the {group}:{name} dependency is required at two different versions: {first} and {second}"
    )]
    VersionConflict {
        group: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("the {0} dependency could not be resolved")]
    Unresolvable(String),

    #[error("could not verify the signature of the file {0}")]
    SignatureMismatch(String),

    #[error("no sibling project named {0} was found")]
    UnknownProject(String),

    #[error(transparent)]
    Cache(#[from] builder_cache::CacheError),

    #[error(transparent)]
    Signing(#[from] builder_signing::SigningError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
