//! Shared-secret gate and the per-request session context.
//!
//! Privilege is never kept on the server: a successful login hands the client
//! a signed cookie holding an expiry instant, and every request rebuilds a
//! [`SessionContext`] from its headers.

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;
use time::OffsetDateTime;

use crate::state::SharedState;

/// Name of the cookie carrying the signed privilege flag.
pub const SESSION_COOKIE: &str = "guess_session";
const PRIVILEGED_PREFIX: &str = "privileged:";

type HmacSha256 = Hmac<Sha256>;

/// Failures while building the gate at startup.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The HMAC primitive refused the generated key.
    #[error("failed to initialise password MAC")]
    MacInit,
}

/// Verifies the operator password and signs privileged sessions.
pub struct SessionGate {
    keyed_mac: HmacSha256,
    password_tag: Vec<u8>,
    cookie_key: Key,
    ttl: Duration,
}

impl SessionGate {
    /// Build a gate for `password`, signing cookies with a key derived from `session_secret`.
    pub fn new(password: &str, session_secret: &str, ttl: Duration) -> Result<Self, SessionError> {
        let mac_key: [u8; 32] = rand::random();
        let keyed_mac =
            HmacSha256::new_from_slice(&mac_key).map_err(|_| SessionError::MacInit)?;

        let mut expected = keyed_mac.clone();
        expected.update(password.as_bytes());
        let password_tag = expected.finalize().into_bytes().to_vec();

        let cookie_key = Key::from(Sha512::digest(session_secret.as_bytes()).as_slice());

        Ok(Self {
            keyed_mac,
            password_tag,
            cookie_key,
            ttl,
        })
    }

    /// Compare `supplied` with the configured password in constant time.
    pub fn authenticate(&self, supplied: &str) -> bool {
        let mut mac = self.keyed_mac.clone();
        mac.update(supplied.as_bytes());
        mac.verify_slice(&self.password_tag).is_ok()
    }

    /// How long a privileged session stays valid.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn jar_from_headers(&self, headers: &HeaderMap) -> SignedCookieJar {
        SignedCookieJar::from_headers(headers, self.cookie_key.clone())
    }

    fn privileged_at(&self, jar: &SignedCookieJar, now_unix: i64) -> bool {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| {
                cookie
                    .value()
                    .strip_prefix(PRIVILEGED_PREFIX)
                    .and_then(|expiry| expiry.parse::<i64>().ok())
            })
            .is_some_and(|expires_at| expires_at > now_unix)
    }

    fn privileged_cookie(&self, now_unix: i64) -> Cookie<'static> {
        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = now_unix.saturating_add(ttl_secs);

        Cookie::build((SESSION_COOKIE, format!("{PRIVILEGED_PREFIX}{expires_at}")))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(ttl_secs))
            .build()
    }
}

/// Session state of the caller, rebuilt from its cookies on every request.
pub struct SessionContext {
    jar: SignedCookieJar,
    privileged: bool,
}

impl SessionContext {
    /// Read the signed session cookie out of `headers`.
    pub fn from_headers(headers: &HeaderMap, gate: &SessionGate) -> Self {
        Self::from_headers_at(headers, gate, now_unix())
    }

    fn from_headers_at(headers: &HeaderMap, gate: &SessionGate, now_unix: i64) -> Self {
        let jar = gate.jar_from_headers(headers);
        let privileged = gate.privileged_at(&jar, now_unix);
        Self { jar, privileged }
    }

    /// Whether the caller presented the shared secret within the session lifetime.
    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    /// Cookie jar marking the caller as privileged from now on.
    pub fn grant(self, gate: &SessionGate) -> SignedCookieJar {
        self.jar.add(gate.privileged_cookie(now_unix()))
    }

    /// Cookie jar dropping any privilege the caller held.
    pub fn revoke(self) -> SignedCookieJar {
        self.jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

impl FromRequestParts<SharedState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, state.gate()))
    }
}

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use axum::{http::header, response::IntoResponse};

    use super::*;

    fn gate() -> SessionGate {
        SessionGate::new("hunter2", "session-secret", Duration::from_secs(60)).unwrap()
    }

    /// Turn the jar's pending Set-Cookie into a request Cookie header.
    fn cookie_headers(jar: SignedCookieJar) -> HeaderMap {
        let response = jar.into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        let pair = set_cookie.split(';').next().unwrap().to_owned();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, pair.parse().unwrap());
        headers
    }

    #[test]
    fn authenticate_accepts_only_the_exact_password() {
        let gate = gate();
        assert!(gate.authenticate("hunter2"));
        assert!(!gate.authenticate("hunter3"));
        assert!(!gate.authenticate("hunter2 "));
        assert!(!gate.authenticate(""));
    }

    #[test]
    fn fresh_session_is_not_privileged() {
        let gate = gate();
        let session = SessionContext::from_headers(&HeaderMap::new(), &gate);
        assert!(!session.is_privileged());
    }

    #[test]
    fn granted_cookie_is_privileged_until_it_expires() {
        let gate = gate();
        let session = SessionContext::from_headers(&HeaderMap::new(), &gate);
        let headers = cookie_headers(session.grant(&gate));

        assert!(SessionContext::from_headers(&headers, &gate).is_privileged());

        let later = now_unix() + 61;
        assert!(!SessionContext::from_headers_at(&headers, &gate, later).is_privileged());
    }

    #[test]
    fn tampered_or_foreign_cookies_are_rejected() {
        let gate = gate();
        let mut forged = HeaderMap::new();
        forged.insert(
            header::COOKIE,
            format!("{SESSION_COOKIE}=privileged:99999999999").parse().unwrap(),
        );
        assert!(!SessionContext::from_headers(&forged, &gate).is_privileged());

        let other = SessionGate::new("hunter2", "another-secret", Duration::from_secs(60)).unwrap();
        let session = SessionContext::from_headers(&HeaderMap::new(), &other);
        let headers = cookie_headers(session.grant(&other));
        assert!(!SessionContext::from_headers(&headers, &gate).is_privileged());
    }
}
