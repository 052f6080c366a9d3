use std::time::SystemTime;

use crate::state::round::Guess;

/// A persisted participant guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessEntity {
    /// Identifier assigned by the store on insertion.
    pub id: i64,
    /// Display name chosen by the participant.
    pub name: String,
    /// Validated numeric guess.
    pub guess: Guess,
    /// Server time at which the guess was recorded.
    pub created_at: SystemTime,
}

/// A persisted cipher submission. The guess is opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherEntity {
    /// Identifier assigned by the store on insertion.
    pub id: i64,
    /// Display name chosen by the participant.
    pub name: String,
    /// Free-form text exactly as submitted.
    pub guess: String,
    /// Server time at which the entry was recorded.
    pub created_at: SystemTime,
}
