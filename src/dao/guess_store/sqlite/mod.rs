mod config;
mod error;
mod schema;
/// The [`SqliteGuessStore`] handle.
pub mod store;

pub use config::SqliteConfig;
pub use error::{SqliteDaoError, SqliteResult};
pub use store::SqliteGuessStore;

use crate::dao::storage::StorageError;

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err {
            SqliteDaoError::CorruptRow { table, reason } => StorageError::Corrupt { table, reason },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
