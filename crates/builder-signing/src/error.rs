#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("io error signing {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
