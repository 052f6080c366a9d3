/// Guess and cipher persistence operations.
pub mod guess_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
