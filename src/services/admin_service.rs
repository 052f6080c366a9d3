//! Business logic powering the operator pages. Every function except
//! [`login`] assumes the caller already passed the privileged-session check.

use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{info, warn};

use crate::{
    dao::guess_store::GuessOrder,
    dto::pages::{CipherRow, GuessRow},
    error::ServiceError,
    services::chart_service,
    state::{SessionContext, SharedState, round::RoundStats},
};

/// Outcome of closing a round.
#[derive(Debug)]
pub enum RoundOutcome {
    /// Nothing was submitted; the round was left untouched.
    NoGuesses,
    /// Statistics and chart of the round that has just been reset.
    Finished {
        /// Participants, average, target and winner.
        stats: RoundStats,
        /// Histogram chart as a data URI.
        chart_uri: String,
    },
}

/// Check the operator password and, on success, mark the session privileged.
pub async fn login(
    state: &SharedState,
    session: SessionContext,
    password: &str,
) -> Result<SignedCookieJar, ServiceError> {
    let gate = state.gate();
    if !gate.authenticate(password) {
        warn!("rejected operator login");
        return Err(ServiceError::Forbidden(
            "Only developers have access to this section. Incorrect password.".into(),
        ));
    }

    info!(ttl_secs = gate.ttl().as_secs(), "operator session granted");
    Ok(session.grant(gate))
}

/// Drop the operator privilege from the caller's session.
pub fn logout(session: SessionContext) -> SignedCookieJar {
    session.revoke()
}

// ---------------------------------------------------------------------------
// Guess round
// ---------------------------------------------------------------------------

/// Compute the final statistics and chart, then reset the round.
///
/// The reset only happens once the chart has been produced, so a rendering
/// failure leaves the guesses in place.
pub async fn finish_round(state: &SharedState) -> Result<RoundOutcome, ServiceError> {
    let store = state.store();
    let entries = store.list_all(GuessOrder::Insertion).await?;

    let Some(stats) = RoundStats::compute(&entries) else {
        return Ok(RoundOutcome::NoGuesses);
    };

    let guesses: Vec<_> = entries.iter().map(|entry| entry.guess).collect();
    let chart_uri = chart_service::render_histograms(&guesses)
        .map_err(|err| ServiceError::Render(err.to_string()))?;

    store.reset_round().await?;
    info!(
        participants = stats.participants,
        average = stats.average,
        target = stats.target,
        winner = %stats.winner_name,
        "round finished and reset"
    );

    Ok(RoundOutcome::Finished { stats, chart_uri })
}

/// Every guess of the running round (highest first) with live statistics.
pub async fn full_listing(
    state: &SharedState,
) -> Result<(Vec<GuessRow>, Option<RoundStats>), ServiceError> {
    let entries = state.store().list_all(GuessOrder::GuessDesc).await?;
    let stats = RoundStats::compute(&entries);
    let rows = entries.into_iter().map(GuessRow::from).collect();
    Ok((rows, stats))
}

/// Remove one guess. Unknown ids are ignored.
pub async fn delete_guess(state: &SharedState, id: i64) -> Result<(), ServiceError> {
    let removed = state.store().delete_by_id(id).await?;
    if removed {
        info!(id, "guess deleted");
    } else {
        warn!(id, "delete requested for unknown guess");
    }
    Ok(())
}

/// Wipe every guess without computing results.
pub async fn reset_round(state: &SharedState) -> Result<(), ServiceError> {
    state.store().reset_round().await?;
    info!("round reset by operator");
    Ok(())
}

// ---------------------------------------------------------------------------
// Cipher
// ---------------------------------------------------------------------------

/// Every cipher answer in submission order.
pub async fn list_ciphers(state: &SharedState) -> Result<Vec<CipherRow>, ServiceError> {
    let entries = state.store().list_ciphers().await?;
    Ok(entries.into_iter().map(CipherRow::from).collect())
}
