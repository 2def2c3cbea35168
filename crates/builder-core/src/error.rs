/// The five top-level error kinds a failing run can surface.
///
/// Individual components define their own narrow error enums (see
/// `builder-schema::SchemaError`, `builder-cache::CacheError`, etc.); this is
/// the widened shape the engine converts them into at the boundary before
/// reporting a single fatal message and exiting.
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("{0}")]
    UserInput(String),

    #[error("{0}")]
    Resolution(String),

    #[error("{status} fetching {url}")]
    Remote { url: String, status: u16 },

    #[error("`{command}` exited with code {code}")]
    Toolchain { command: String, code: i32 },

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuilderError {
    /// The process exit code this error should produce, per §7: a toolchain's own
    /// return code on a disallowed-code failure, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuilderError::Toolchain { code, .. } => *code,
            _ => 1,
        }
    }
}
