use thiserror::Error;

/// Error kinds raised by the record access layer.
///
/// The facade and CLI layers wrap these in `anyhow`; the enum exists so
/// callers can distinguish a missing row from a failed write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted row does not exist. Update and delete report this
    /// explicitly instead of silently succeeding; callers decide whether
    /// to treat it as success.
    #[error("record {0} not found")]
    NotFound(i64),

    /// The underlying SQLite write or read failed (constraint violation,
    /// connectivity loss). Surfaced as-is, never retried.
    #[error("persistence failure: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// Input rejected before it reaches SQL. The only write-time rule is
    /// the non-empty organization name; range checks on percentages stay
    /// a data-quality concern upstream.
    #[error("invalid record: {0}")]
    Validation(String),
}
