//! Form payloads posted by the HTML pages.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dto::validation::validate_display_name;

/// Participant submission for the numeric game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitGuessForm {
    /// Participant name; blank when the field is missing.
    #[serde(default)]
    pub name: String,
    /// Raw text; parsed into a bounded guess by the guess service.
    #[serde(default)]
    pub guess: String,
}

impl Validate for SubmitGuessForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_display_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Participant submission for the cipher game. The guess is free text.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CipherForm {
    /// Participant name; blank when the field is missing.
    #[serde(default)]
    pub name: String,
    /// Answer text, kept exactly as typed.
    #[serde(default)]
    pub guess: String,
}

impl Validate for CipherForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_display_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Operator login form. A missing or empty password is just a wrong one.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordForm {
    /// Shared operator secret.
    #[serde(default)]
    pub password: String,
}

/// Removal of a single guess from the current round.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteEntryForm {
    /// Id of the guess to remove.
    pub entry_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_blank_text() {
        let form: SubmitGuessForm = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(form.name, "Ada");
        assert_eq!(form.guess, "");
        assert!(form.validate().is_ok());

        let form: SubmitGuessForm = serde_json::from_str(r#"{"guess":"10"}"#).unwrap();
        assert!(form.validate().is_err());

        let form: CipherForm = serde_json::from_str("{}").unwrap();
        assert!(form.validate().is_err());

        let form: PasswordForm = serde_json::from_str("{}").unwrap();
        assert_eq!(form.password, "");
    }
}
