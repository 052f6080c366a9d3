//! Service helpers behind the participant-facing pages.

use tracing::{info, warn};

use crate::{
    dto::{
        forms::{CipherForm, SubmitGuessForm},
        validation::parse_guess,
    },
    error::ServiceError,
    state::SharedState,
};

/// Number of guesses recorded in the running round.
pub async fn participant_count(state: &SharedState) -> Result<u64, ServiceError> {
    Ok(state.store().count().await?)
}

/// Record a guess and return the updated participant count.
///
/// The name is expected to have passed form validation already; the guess
/// text is parsed here so a bad number yields a participant-friendly message.
pub async fn submit_guess(
    state: &SharedState,
    form: SubmitGuessForm,
) -> Result<u64, ServiceError> {
    let guess = parse_guess(&form.guess).map_err(|err| {
        warn!(raw = %form.guess, error = %err, "rejected guess");
        ServiceError::InvalidInput(err.to_string())
    })?;
    let name = form.name.trim().to_owned();

    let store = state.store();
    let id = store.append(name.clone(), guess).await?;
    info!(id, %name, %guess, "new guess recorded");

    Ok(store.count().await?)
}

/// Record a cipher answer verbatim and return the trimmed participant name.
pub async fn submit_cipher(state: &SharedState, form: CipherForm) -> Result<String, ServiceError> {
    let name = form.name.trim().to_owned();
    let id = state
        .store()
        .append_cipher(name.clone(), form.guess)
        .await?;
    info!(id, %name, "new cipher answer recorded");
    Ok(name)
}
