//! Validation helpers for DTOs.

use thiserror::Error;
use validator::ValidationError;

use crate::state::round::{Guess, GuessOutOfRange};

/// Longest display name accepted, counted in characters after trimming.
pub const MAX_NAME_CHARS: usize = 100;

/// Reasons a submitted guess is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessInputError {
    /// The text is not an integer.
    #[error("Please enter a valid number.")]
    NotANumber,
    /// The integer lies outside the playable range.
    #[error("Please enter a number between 0 and 100.")]
    OutOfRange(i64),
}

impl From<GuessOutOfRange> for GuessInputError {
    fn from(err: GuessOutOfRange) -> Self {
        GuessInputError::OutOfRange(err.0)
    }
}

/// Parse the raw form text of a guess into a bounded [`Guess`].
///
/// # Examples
///
/// ```ignore
/// parse_guess(" 42 ") // Ok
/// parse_guess("101")  // Err - out of range
/// parse_guess("4.2")  // Err - not an integer
/// ```
pub fn parse_guess(raw: &str) -> Result<Guess, GuessInputError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| GuessInputError::NotANumber)?;
    Ok(Guess::try_from(value)?)
}

/// Validates that a display name is non-blank and not longer than [`MAX_NAME_CHARS`].
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        let mut err = ValidationError::new("name_required");
        err.message = Some("Please enter your name.".into());
        return Err(err);
    }

    let length = trimmed.chars().count();
    if length > MAX_NAME_CHARS {
        let mut err = ValidationError::new("name_length");
        err.message = Some(
            format!("Name must be at most {MAX_NAME_CHARS} characters (got {length})").into(),
        );
        return Err(err);
    }

    Ok(())
}
