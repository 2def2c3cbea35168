#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("http error fetching schema: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("io error fetching schema: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json in fetched schema: {0}")]
    Json(#[from] serde_json::Error),
}
