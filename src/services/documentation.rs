use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the guessing game server.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::public::index,
        crate::routes::public::submit_guess,
        crate::routes::public::cipher_form,
        crate::routes::public::submit_cipher,
        crate::routes::admin::final_result_form,
        crate::routes::admin::final_result_login,
        crate::routes::admin::cipher_result_form,
        crate::routes::admin::cipher_result_login,
        crate::routes::admin::logout,
        crate::routes::admin::show_results,
        crate::routes::admin::show_full,
        crate::routes::admin::show_cipher_full,
        crate::routes::admin::delete_entry,
        crate::routes::admin::reset_round,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::forms::SubmitGuessForm,
            crate::dto::forms::CipherForm,
            crate::dto::forms::PasswordForm,
            crate::dto::forms::DeleteEntryForm,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Guess submission for participants"),
        (name = "admin", description = "Operator login, results and round maintenance"),
        (name = "cipher", description = "Cipher answer submission and review"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_form_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/submit",
            "/final_result",
            "/results",
            "/full",
            "/delete",
            "/reset-db",
            "/cipher",
            "/cipher_submit",
            "/cipher_result",
            "/cipher_full",
            "/logout",
            "/healthcheck",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
