use rusqlite::Connection;

use super::error::{SqliteDaoError, SqliteResult};

pub(super) const GUESS_TABLE: &str = "guesses";
pub(super) const CIPHER_TABLE: &str = "cipher";

const CREATE_GUESSES: &str = "
    CREATE TABLE IF NOT EXISTS guesses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        guess INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    )";

const CREATE_CIPHER: &str = "
    CREATE TABLE IF NOT EXISTS cipher (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        guess TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// Create both tables when they do not exist yet.
pub(super) fn ensure_tables(conn: &Connection) -> SqliteResult<()> {
    conn.execute(CREATE_GUESSES, [])
        .map_err(|source| SqliteDaoError::Schema {
            table: GUESS_TABLE,
            source,
        })?;
    conn.execute(CREATE_CIPHER, [])
        .map_err(|source| SqliteDaoError::Schema {
            table: CIPHER_TABLE,
            source,
        })?;
    Ok(())
}

/// Drop and recreate the guesses table in one transaction.
pub(super) fn recreate_guesses(conn: &mut Connection) -> SqliteResult<()> {
    let schema_err = |source| SqliteDaoError::Schema {
        table: GUESS_TABLE,
        source,
    };

    let tx = conn.transaction().map_err(schema_err)?;
    tx.execute("DROP TABLE IF EXISTS guesses", [])
        .map_err(schema_err)?;
    tx.execute(CREATE_GUESSES, []).map_err(schema_err)?;
    tx.commit().map_err(schema_err)
}
