use axum::Router;

use crate::state::SharedState;

/// Operator login, results and round maintenance.
pub mod admin;
/// Swagger UI and OpenAPI document.
pub mod docs;
/// Health check endpoint.
pub mod health;
/// Guess and cipher submission pages.
pub mod public;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(public::router())
        .merge(admin::router(state.clone()))
        .merge(docs::router())
        .with_state(state)
}
