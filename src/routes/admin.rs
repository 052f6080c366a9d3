use axum::{
    Form, Router,
    body::Body,
    extract::{State, rejection::FormRejection},
    http::Request,
    middleware::{self, Next},
    response::{Html, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::{
    dto::{
        forms::{DeleteEntryForm, PasswordForm},
        pages::{
            CipherFullPage, FullResultPage, MessagePage, PasswordPage, ResultsPage, render,
        },
    },
    error::AppError,
    services::admin_service::{self, RoundOutcome},
    state::{SessionContext, SharedState},
};

const FULL_LISTING: &str = "/full";
const CIPHER_LISTING: &str = "/cipher_full";

/// Operator pages. Everything but the login forms requires a privileged session.
pub fn router(state: SharedState) -> Router<SharedState> {
    let privileged = Router::new()
        .route("/results", get(show_results))
        .route(FULL_LISTING, get(show_full))
        .route(CIPHER_LISTING, get(show_cipher_full))
        .route("/delete", post(delete_entry))
        .route("/reset-db", post(reset_round))
        .route_layer(middleware::from_fn_with_state(
            state,
            require_privileged_session,
        ));

    Router::new()
        .route("/final_result", get(final_result_form).post(final_result_login))
        .route("/cipher_result", get(cipher_result_form).post(cipher_result_login))
        .route("/logout", post(logout))
        .merge(privileged)
}

#[utoipa::path(
    get,
    path = "/final_result",
    tag = "admin",
    responses((status = 200, description = "Operator password form", body = String, content_type = "text/html"))
)]
/// Ask for the operator password before showing the round.
pub async fn final_result_form() -> Result<Html<String>, AppError> {
    Ok(render(&PasswordPage {
        title: "Final result",
        action: "/final_result",
    })?)
}

#[utoipa::path(
    post,
    path = "/final_result",
    tag = "admin",
    request_body(content = PasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Session granted, redirect to the full listing"),
        (status = 403, description = "Incorrect password")
    )
)]
/// Check the password and open an operator session for the guess round.
pub async fn final_result_login(
    State(state): State<SharedState>,
    session: SessionContext,
    form: Result<Form<PasswordForm>, FormRejection>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    let Form(form) = form?;
    let jar = admin_service::login(&state, session, &form.password).await?;
    Ok((jar, Redirect::to(FULL_LISTING)))
}

#[utoipa::path(
    get,
    path = "/cipher_result",
    tag = "cipher",
    responses((status = 200, description = "Operator password form", body = String, content_type = "text/html"))
)]
/// Ask for the operator password before showing cipher answers.
pub async fn cipher_result_form() -> Result<Html<String>, AppError> {
    Ok(render(&PasswordPage {
        title: "Cipher answers",
        action: "/cipher_result",
    })?)
}

#[utoipa::path(
    post,
    path = "/cipher_result",
    tag = "cipher",
    request_body(content = PasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Session granted, redirect to the cipher listing"),
        (status = 403, description = "Incorrect password")
    )
)]
/// Check the password and open an operator session for the cipher answers.
pub async fn cipher_result_login(
    State(state): State<SharedState>,
    session: SessionContext,
    form: Result<Form<PasswordForm>, FormRejection>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    let Form(form) = form?;
    let jar = admin_service::login(&state, session, &form.password).await?;
    Ok((jar, Redirect::to(CIPHER_LISTING)))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "admin",
    responses((status = 303, description = "Session cleared, redirect to the home page"))
)]
/// End the operator session.
pub async fn logout(session: SessionContext) -> (SignedCookieJar, Redirect) {
    (admin_service::logout(session), Redirect::to("/"))
}

#[utoipa::path(
    get,
    path = "/results",
    tag = "admin",
    responses(
        (status = 200, description = "Final statistics, chart and winner; the round is reset", body = String, content_type = "text/html"),
        (status = 403, description = "No privileged session")
    )
)]
/// Close the round: show statistics, chart and winner, then wipe the guesses.
pub async fn show_results(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    match admin_service::finish_round(&state).await? {
        RoundOutcome::NoGuesses => Ok(render(&MessagePage {
            message: "No guesses recorded yet.".into(),
        })?),
        RoundOutcome::Finished { stats, chart_uri } => {
            Ok(render(&ResultsPage { stats, chart_uri })?)
        }
    }
}

#[utoipa::path(
    get,
    path = "/full",
    tag = "admin",
    responses(
        (status = 200, description = "Every guess of the running round", body = String, content_type = "text/html"),
        (status = 403, description = "No privileged session")
    )
)]
/// List every guess of the running round without resetting it.
pub async fn show_full(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    let (rows, stats) = admin_service::full_listing(&state).await?;
    Ok(render(&FullResultPage { rows, stats })?)
}

#[utoipa::path(
    get,
    path = "/cipher_full",
    tag = "cipher",
    responses(
        (status = 200, description = "Every cipher answer", body = String, content_type = "text/html"),
        (status = 403, description = "No privileged session")
    )
)]
/// List every cipher answer.
pub async fn show_cipher_full(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    let rows = admin_service::list_ciphers(&state).await?;
    Ok(render(&CipherFullPage { rows })?)
}

#[utoipa::path(
    post,
    path = "/delete",
    tag = "admin",
    request_body(content = DeleteEntryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Guess removed (or already absent), redirect to the full listing"),
        (status = 400, description = "Missing or non-integer entry id"),
        (status = 403, description = "No privileged session")
    )
)]
/// Remove one guess from the round.
pub async fn delete_entry(
    State(state): State<SharedState>,
    form: Result<Form<DeleteEntryForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    admin_service::delete_guess(&state, form.entry_id).await?;
    Ok(Redirect::to(FULL_LISTING))
}

#[utoipa::path(
    post,
    path = "/reset-db",
    tag = "admin",
    responses(
        (status = 303, description = "Round wiped, redirect to the full listing"),
        (status = 403, description = "No privileged session")
    )
)]
/// Wipe the round without computing results.
pub async fn reset_round(State(state): State<SharedState>) -> Result<Redirect, AppError> {
    admin_service::reset_round(&state).await?;
    Ok(Redirect::to(FULL_LISTING))
}

async fn require_privileged_session(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = SessionContext::from_headers(req.headers(), state.gate());

    if session.is_privileged() {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Forbidden(
            "Only developers have access to this section.".into(),
        ))
    }
}
