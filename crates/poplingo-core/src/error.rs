use poplingo_gemini::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Stored collection is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Nothing to look up")]
    EmptyQuery,

    #[error("Definition generation failed: {0}")]
    Definition(#[from] GatewayError),

    #[error("A newer search replaced this one")]
    Superseded,
}
