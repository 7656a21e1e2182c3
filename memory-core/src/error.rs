use uuid::Uuid;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds for the memory substrate.
///
/// This set is exhaustive by design: every public API returns one of these
/// variants rather than leaking a storage- or provider-specific error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced id was not found. Always recoverable by the caller.
    #[error("not found: {0}")]
    NotFound(Uuid),

    /// An embedding dimension or enum value was rejected by the store.
    /// Fatal to the operation, not to the process.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Internal-only: working-memory capacity would be exceeded. Never
    /// surfaced past the buffer that raised it; callers always see the
    /// post-eviction state instead.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// The embedder is down or timed out. Retrieval falls back to the
    /// keyword path; consolidation proceeds without an embedding.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// A consolidation transaction was rolled back. The caller may retry
    /// with a different target layer.
    #[error("consolidation failed: {0}")]
    ConsolidationFailed(String),

    /// Cooperative cancellation observed at a stage boundary.
    #[error("cancelled")]
    Cancelled,

    /// Underlying persistence failure. Fatal to the current transaction.
    #[error("store error: {0}")]
    StoreError(String),

    /// Malformed input that can't be mapped to any of the above.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization failure on a stored blob.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller can usefully retry the operation.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::NotFound(_)
            | Error::EmbeddingUnavailable(_)
            | Error::ConsolidationFailed(_)
            | Error::Cancelled
            | Error::StoreError(_) => true,
            Error::SchemaMismatch(_)
            | Error::CapacityExceeded(_)
            | Error::InvalidInput(_)
            | Error::Serialization(_) => false,
        }
    }
}
