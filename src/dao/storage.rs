use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be reached or a statement failed.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable summary of the failure.
        message: String,
        /// Backend error that caused it.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A stored row no longer satisfies the entity invariants.
    #[error("corrupt row in `{table}`: {reason}")]
    Corrupt {
        /// Table the row was read from.
        table: &'static str,
        /// Which invariant the row breaks.
        reason: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
