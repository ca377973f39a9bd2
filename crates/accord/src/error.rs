//! Engine errors.
//!
//! Producer and comparator trouble never becomes an `Err`: it is folded
//! into candidate values and round outcomes. The only conditions that
//! propagate are invalid round parameters and storage-layer failures.

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, AccordError>;

/// Errors surfaced by the engine facade.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AccordError {
    /// Round parameters were invalid (empty fingerprint, zero executors,
    /// malformed comparator spec)
    #[error("invalid round: {0}")]
    InvalidRound(String),

    /// The persistence layer itself is unavailable
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the result store backend.
///
/// Distinct from a missing record: `get` returning `Ok(None)` means
/// "never committed", while a `StoreError` means the backend could not
/// answer at all.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backend unreachable or refusing service
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Read or write failed mid-operation
    #[error("store operation failed: {0}")]
    Backend(String),
}
