#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to determine a home directory for the default cache root")]
    MissingHomeDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{status} fetching {url}")]
    Remote { url: String, status: u16 },

    #[error("http error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
}
