/// SQLite implementation of [`GuessStore`].
pub mod sqlite;

use crate::dao::models::{CipherEntity, GuessEntity};
use crate::dao::storage::StorageResult;
use crate::state::round::Guess;
use futures::future::BoxFuture;

/// Ordering applied when listing every guess of the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuessOrder {
    /// Highest guess first; equal guesses by ascending id.
    #[default]
    GuessDesc,
    /// Submission order (ascending id).
    Insertion,
}

/// Abstraction over the persistence layer for guesses and cipher entries.
pub trait GuessStore: Send + Sync {
    /// Record a guess and return its id.
    fn append(&self, name: String, guess: Guess) -> BoxFuture<'static, StorageResult<i64>>;
    /// Number of guesses in the running round.
    fn count(&self) -> BoxFuture<'static, StorageResult<u64>>;
    /// Every guess of the running round in the requested order.
    fn list_all(&self, order: GuessOrder) -> BoxFuture<'static, StorageResult<Vec<GuessEntity>>>;
    /// Returns whether a row was removed; unknown ids are not an error.
    fn delete_by_id(&self, id: i64) -> BoxFuture<'static, StorageResult<bool>>;
    /// Drop every guess and start from an empty table. Cipher rows are kept.
    fn reset_round(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Record a cipher answer verbatim and return its id.
    fn append_cipher(&self, name: String, text: String) -> BoxFuture<'static, StorageResult<i64>>;
    /// Every cipher answer in submission order.
    fn list_ciphers(&self) -> BoxFuture<'static, StorageResult<Vec<CipherEntity>>>;
    /// Run a trivial query to prove the database answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
