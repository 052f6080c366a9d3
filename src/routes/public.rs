use axum::{
    Form, Router,
    extract::{State, rejection::FormRejection},
    response::Html,
    routing::{get, post},
};
use axum_valid::{Valid, ValidRejection};

use crate::{
    dto::{
        forms::{CipherForm, SubmitGuessForm},
        pages::{CipherPage, CipherThankYouPage, IndexPage, ThankYouPage, render},
    },
    error::AppError,
    services::public_service,
    state::SharedState,
};

/// Participant-facing pages: the guess form and the cipher form.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(index))
        .route("/submit", post(submit_guess))
        .route("/cipher", get(cipher_form))
        .route("/cipher_submit", post(submit_cipher))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "game",
    responses((status = 200, description = "Guess form with the participant count", body = String, content_type = "text/html"))
)]
/// Show the guess form and how many people have played so far.
pub async fn index(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    let count = public_service::participant_count(&state).await?;
    Ok(render(&IndexPage { count })?)
}

#[utoipa::path(
    post,
    path = "/submit",
    tag = "game",
    request_body(content = SubmitGuessForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Guess recorded", body = String, content_type = "text/html"),
        (status = 400, description = "Missing name or guess outside 0..=100")
    )
)]
/// Validate and record a guess.
pub async fn submit_guess(
    State(state): State<SharedState>,
    form: Result<Valid<Form<SubmitGuessForm>>, ValidRejection<FormRejection>>,
) -> Result<Html<String>, AppError> {
    let Valid(Form(form)) = form?;
    let count = public_service::submit_guess(&state, form).await?;
    Ok(render(&ThankYouPage { count })?)
}

#[utoipa::path(
    get,
    path = "/cipher",
    tag = "cipher",
    responses((status = 200, description = "Cipher answer form", body = String, content_type = "text/html"))
)]
/// Show the cipher answer form.
pub async fn cipher_form() -> Result<Html<String>, AppError> {
    Ok(render(&CipherPage {
        action: "/cipher_submit",
    })?)
}

#[utoipa::path(
    post,
    path = "/cipher_submit",
    tag = "cipher",
    request_body(content = CipherForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Answer recorded", body = String, content_type = "text/html"),
        (status = 400, description = "Missing name")
    )
)]
/// Record a cipher answer exactly as typed.
pub async fn submit_cipher(
    State(state): State<SharedState>,
    form: Result<Valid<Form<CipherForm>>, ValidRejection<FormRejection>>,
) -> Result<Html<String>, AppError> {
    let Valid(Form(form)) = form?;
    let name = public_service::submit_cipher(&state, form).await?;
    Ok(render(&CipherThankYouPage { name })?)
}
