//! Error types shared by the SQLite storage implementation.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with SQLite.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// The database file could not be opened.
    #[error("failed to open SQLite database `{}`", path.display())]
    Open {
        /// Location of the database file.
        path: PathBuf,
        /// Driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// Connection-level settings could not be applied.
    #[error("failed to configure SQLite connection")]
    Configure {
        /// Driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating or recreating a table failed.
    #[error("failed to prepare schema for `{table}`")]
    Schema {
        /// Table being created.
        table: &'static str,
        /// Driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// A statement against a table failed.
    #[error("failed to {operation} in `{table}`")]
    Query {
        /// What the statement was doing, e.g. `insert guess`.
        operation: &'static str,
        /// Table the statement targeted.
        table: &'static str,
        /// Driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored row violates the entity invariants.
    #[error("corrupt row in `{table}`: {reason}")]
    CorruptRow {
        /// Table the row was read from.
        table: &'static str,
        /// Which invariant the row breaks.
        reason: String,
    },
    /// The blocking worker running the statement panicked or was cancelled.
    #[error("SQLite worker task failed")]
    Worker {
        /// Join failure reported by tokio.
        #[source]
        source: tokio::task::JoinError,
    },
}
