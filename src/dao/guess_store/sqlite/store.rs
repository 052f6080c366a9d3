use std::{
    path::Path,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use futures::future::BoxFuture;
use rusqlite::{Connection, params};

use super::{
    config::SqliteConfig,
    error::{SqliteDaoError, SqliteResult},
    schema::{self, CIPHER_TABLE, GUESS_TABLE},
};
use crate::{
    dao::{
        guess_store::{GuessOrder, GuessStore},
        models::{CipherEntity, GuessEntity},
        storage::StorageResult,
    },
    state::round::Guess,
};

/// [`GuessStore`] backed by a single SQLite database file.
///
/// No connection is kept open between calls: each operation opens the file on
/// a blocking worker, runs its statement and closes the handle again.
#[derive(Clone)]
pub struct SqliteGuessStore {
    inner: Arc<SqliteInner>,
}

struct SqliteInner {
    config: SqliteConfig,
}

impl SqliteInner {
    fn connect(&self) -> SqliteResult<Connection> {
        let conn = Connection::open(&self.config.path).map_err(|source| SqliteDaoError::Open {
            path: self.config.path.clone(),
            source,
        })?;
        conn.busy_timeout(self.config.busy_timeout)
            .map_err(|source| SqliteDaoError::Configure { source })?;
        Ok(conn)
    }
}

struct RawGuessRow {
    id: i64,
    name: String,
    guess: i64,
    created_at: i64,
}

impl TryFrom<RawGuessRow> for GuessEntity {
    type Error = SqliteDaoError;

    fn try_from(row: RawGuessRow) -> Result<Self, Self::Error> {
        let guess = Guess::try_from(row.guess).map_err(|err| SqliteDaoError::CorruptRow {
            table: GUESS_TABLE,
            reason: format!("row {}: {err}", row.id),
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            guess,
            created_at: from_unix_millis(row.created_at),
        })
    }
}

impl SqliteGuessStore {
    /// Open (creating if needed) the database file and make sure both tables exist.
    pub async fn open(config: SqliteConfig) -> SqliteResult<Self> {
        let store = Self {
            inner: Arc::new(SqliteInner { config }),
        };
        store.run(|conn| schema::ensure_tables(conn)).await?;
        Ok(store)
    }

    /// Location of the backing database file.
    pub fn path(&self) -> &Path {
        &self.inner.config.path
    }

    /// Run `work` against a fresh connection on the blocking thread pool.
    async fn run<T, F>(&self, work: F) -> SqliteResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> SqliteResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut conn = inner.connect()?;
            work(&mut conn)
        })
        .await
        .map_err(|source| SqliteDaoError::Worker { source })?
    }

    async fn insert_guess(&self, name: String, guess: Guess) -> SqliteResult<i64> {
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO guesses (name, guess, created_at) VALUES (?1, ?2, ?3)",
                params![name, i64::from(guess), unix_millis_now()],
            )
            .map_err(query_err("insert guess", GUESS_TABLE))?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn count_guesses(&self) -> SqliteResult<u64> {
        self.run(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM guesses", [], |row| row.get(0))
                .map_err(query_err("count guesses", GUESS_TABLE))?;
            Ok(count.max(0) as u64)
        })
        .await
    }

    async fn load_guesses(&self, order: GuessOrder) -> SqliteResult<Vec<GuessEntity>> {
        let sql = match order {
            GuessOrder::GuessDesc => {
                "SELECT id, name, guess, created_at FROM guesses ORDER BY guess DESC, id ASC"
            }
            GuessOrder::Insertion => {
                "SELECT id, name, guess, created_at FROM guesses ORDER BY id ASC"
            }
        };

        self.run(move |conn| {
            let mut stmt = conn
                .prepare(sql)
                .map_err(query_err("list guesses", GUESS_TABLE))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(RawGuessRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        guess: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .map_err(query_err("list guesses", GUESS_TABLE))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(query_err("list guesses", GUESS_TABLE))?;

            rows.into_iter().map(GuessEntity::try_from).collect()
        })
        .await
    }

    async fn remove_guess(&self, id: i64) -> SqliteResult<bool> {
        self.run(move |conn| {
            let affected = conn
                .execute("DELETE FROM guesses WHERE id = ?1", params![id])
                .map_err(query_err("delete guess", GUESS_TABLE))?;
            Ok(affected > 0)
        })
        .await
    }

    async fn insert_cipher(&self, name: String, text: String) -> SqliteResult<i64> {
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO cipher (name, guess, created_at) VALUES (?1, ?2, ?3)",
                params![name, text, unix_millis_now()],
            )
            .map_err(query_err("insert cipher entry", CIPHER_TABLE))?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn load_ciphers(&self) -> SqliteResult<Vec<CipherEntity>> {
        self.run(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, guess, created_at FROM cipher ORDER BY id ASC")
                .map_err(query_err("list cipher entries", CIPHER_TABLE))?;
            let entries = stmt
                .query_map([], |row| {
                    Ok(CipherEntity {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        guess: row.get(2)?,
                        created_at: from_unix_millis(row.get(3)?),
                    })
                })
                .map_err(query_err("list cipher entries", CIPHER_TABLE))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(query_err("list cipher entries", CIPHER_TABLE))?;
            Ok(entries)
        })
        .await
    }
}

impl GuessStore for SqliteGuessStore {
    fn append(&self, name: String, guess: Guess) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move { store.insert_guess(name, guess).await.map_err(Into::into) })
    }

    fn count(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.count_guesses().await.map_err(Into::into) })
    }

    fn list_all(&self, order: GuessOrder) -> BoxFuture<'static, StorageResult<Vec<GuessEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.load_guesses(order).await.map_err(Into::into) })
    }

    fn delete_by_id(&self, id: i64) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.remove_guess(id).await.map_err(Into::into) })
    }

    fn reset_round(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .run(|conn| schema::recreate_guesses(conn))
                .await
                .map_err(Into::into)
        })
    }

    fn append_cipher(&self, name: String, text: String) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move { store.insert_cipher(name, text).await.map_err(Into::into) })
    }

    fn list_ciphers(&self) -> BoxFuture<'static, StorageResult<Vec<CipherEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.load_ciphers().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .run(|conn| {
                    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                        .map_err(query_err("ping", GUESS_TABLE))?;
                    Ok(())
                })
                .await
                .map_err(Into::into)
        })
    }
}

fn query_err(
    operation: &'static str,
    table: &'static str,
) -> impl Fn(rusqlite::Error) -> SqliteDaoError {
    move |source| SqliteDaoError::Query {
        operation,
        table,
        source,
    }
}

fn unix_millis_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

fn from_unix_millis(millis: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(millis.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn open_store() -> (TempDir, SqliteGuessStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteGuessStore::open(SqliteConfig::new(dir.path().join("game.db")))
            .await
            .unwrap();
        (dir, store)
    }

    fn guess(value: i64) -> Guess {
        Guess::try_from(value).unwrap()
    }

    #[tokio::test]
    async fn append_increments_count_and_keeps_the_value() {
        let (_dir, store) = open_store().await;

        for (idx, value) in [0, 37, 100].into_iter().enumerate() {
            store.append(format!("p{idx}"), guess(value)).await.unwrap();
            assert_eq!(store.count().await.unwrap(), idx as u64 + 1);
        }

        let stored: Vec<_> = store
            .list_all(GuessOrder::Insertion)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| (entry.name, entry.guess.value()))
            .collect();
        assert_eq!(
            stored,
            vec![("p0".into(), 0), ("p1".into(), 37), ("p2".into(), 100)]
        );
    }

    #[tokio::test]
    async fn ids_are_assigned_in_increasing_order() {
        let (_dir, store) = open_store().await;
        let first = store.append("a".into(), guess(1)).await.unwrap();
        let second = store.append("b".into(), guess(2)).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn list_all_orders_by_guess_descending_then_id() {
        let (_dir, store) = open_store().await;
        store.append("low".into(), guess(5)).await.unwrap();
        store.append("high".into(), guess(80)).await.unwrap();
        store.append("tie-first".into(), guess(40)).await.unwrap();
        store.append("tie-second".into(), guess(40)).await.unwrap();

        let names: Vec<_> = store
            .list_all(GuessOrder::GuessDesc)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["high", "tie-first", "tie-second", "low"]);
    }

    #[tokio::test]
    async fn listing_an_empty_table_returns_nothing() {
        let (_dir, store) = open_store().await;
        assert!(store.list_all(GuessOrder::default()).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_unknown_id_is_a_no_op() {
        let (_dir, store) = open_store().await;
        let id = store.append("a".into(), guess(10)).await.unwrap();

        assert!(!store.delete_by_id(id + 1000).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);

        assert!(store.delete_by_id(id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reset_round_wipes_guesses_but_keeps_ciphers() {
        let (_dir, store) = open_store().await;
        store.append("a".into(), guess(10)).await.unwrap();
        store.append("b".into(), guess(20)).await.unwrap();
        store
            .append_cipher("c".into(), "open sesame".into())
            .await
            .unwrap();

        store.reset_round().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.list_all(GuessOrder::default()).await.unwrap().is_empty());
        let ciphers = store.list_ciphers().await.unwrap();
        assert_eq!(ciphers.len(), 1);
        assert_eq!(ciphers[0].guess, "open sesame");

        store.append("d".into(), guess(30)).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cipher_text_is_stored_verbatim() {
        let (_dir, store) = open_store().await;
        let text = "  <b>42</b> ; DROP TABLE cipher; --  ";
        store.append_cipher("x".into(), text.into()).await.unwrap();
        store.append_cipher("y".into(), String::new()).await.unwrap();

        let ciphers = store.list_ciphers().await.unwrap();
        assert_eq!(ciphers[0].guess, text);
        assert_eq!(ciphers[1].guess, "");
    }

    #[tokio::test]
    async fn data_survives_reopening_the_file() {
        let (dir, store) = open_store().await;
        store.append("a".into(), guess(64)).await.unwrap();
        drop(store);

        let reopened = SqliteGuessStore::open(SqliteConfig::new(dir.path().join("game.db")))
            .await
            .unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        reopened.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn writes_give_up_after_the_busy_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.db");
        let store = SqliteGuessStore::open(
            SqliteConfig::new(&path).with_busy_timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap();

        let blocker = Connection::open(&path).unwrap();
        blocker.execute_batch("BEGIN EXCLUSIVE;").unwrap();

        assert!(store.append("Ada".into(), guess(42)).await.is_err());

        blocker.execute_batch("COMMIT;").unwrap();
        store.append("Ada".into(), guess(42)).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn out_of_range_rows_are_reported_as_corrupt() {
        let (_dir, store) = open_store().await;
        let path = store.path().to_path_buf();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(path).unwrap();
            conn.execute(
                "INSERT INTO guesses (name, guess, created_at) VALUES ('bad', 500, 0)",
                [],
            )
            .unwrap();
        })
        .await
        .unwrap();

        let err = store.list_all(GuessOrder::default()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::dao::storage::StorageError::Corrupt { table: "guesses", .. }
        ));
    }
}
