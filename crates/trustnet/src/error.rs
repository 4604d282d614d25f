//! Error types for trustnet.
//!
//! All errors are strongly typed and propagated without panicking.
//! Raw key material is never included in error messages; identities
//! appear only as short fingerprints.

/// Trust store error types covering all operations.
///
/// None of these are fatal: the store remains usable after any single
/// failed intent.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    /// The key validator rejected the raw key material.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A remove targeted a key with no entry under the given identity.
    #[error("no trusted entry for key {0}")]
    NotFound(String),

    /// The operation referenced an identity not present in the mapping.
    #[error("unknown identity: {0}")]
    UnknownIdentity(String),

    /// The dispatcher's consumer loop has shut down.
    #[error("dispatcher is closed")]
    DispatcherClosed,

    /// The intent queue is at capacity (non-blocking submission only).
    #[error("intent queue is full")]
    QueueFull,

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, TrustError>;
