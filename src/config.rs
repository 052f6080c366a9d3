//! Startup configuration read from the process environment.

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;
use tracing::info;

const PASSWORD_VAR: &str = "DEVELOPER_PASSWORD";
const SECRET_VAR: &str = "SECRET_KEY";
const PORT_VAR: &str = "PORT";
const DATABASE_VAR: &str = "DATABASE_PATH";
const SESSION_TTL_VAR: &str = "SESSION_TTL_SECS";

/// Listen port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 10000;
/// SQLite file used when `DATABASE_PATH` is unset.
pub const DEFAULT_DATABASE_PATH: &str = "guess_game.db";
/// Privileged session lifetime used when `SESSION_TTL_SECS` is unset.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Reasons the environment cannot be turned into an [`AppConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("environment variable `{0}` must be set to a non-empty value")]
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    #[error("environment variable `{name}` has invalid value `{value}`")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value as found in the environment.
        value: String,
    },
}

#[derive(Clone)]
/// Immutable runtime configuration shared by `main`.
pub struct AppConfig {
    /// Shared operator secret unlocking the result pages.
    pub developer_password: String,
    /// Secret the session cookie signing key is derived from.
    pub session_secret: String,
    /// HTTP listen port.
    pub port: u16,
    /// Location of the SQLite database file.
    pub database_path: PathBuf,
    /// How long a privileged session stays valid.
    pub session_ttl: Duration,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let developer_password = present(PASSWORD_VAR).ok_or(ConfigError::Missing(PASSWORD_VAR))?;
        let session_secret = present(SECRET_VAR).ok_or(ConfigError::Missing(SECRET_VAR))?;

        let port = match present(PORT_VAR) {
            Some(raw) => parse_number::<u16>(PORT_VAR, raw)?,
            None => DEFAULT_PORT,
        };

        let database_path = present(DATABASE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let session_ttl = match present(SESSION_TTL_VAR) {
            Some(raw) => match parse_number::<u64>(SESSION_TTL_VAR, raw.clone())? {
                0 => {
                    return Err(ConfigError::Invalid {
                        name: SESSION_TTL_VAR,
                        value: raw,
                    });
                }
                secs => Duration::from_secs(secs),
            },
            None => DEFAULT_SESSION_TTL,
        };

        info!(
            port,
            database = %database_path.display(),
            session_ttl_secs = session_ttl.as_secs(),
            "loaded configuration"
        );

        Ok(Self {
            developer_password,
            session_secret,
            port,
            database_path,
            session_ttl,
        })
    }
}

// Secrets stay out of logs and panic messages.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("developer_password", &"<redacted>")
            .field("session_secret", &"<redacted>")
            .field("port", &self.port)
            .field("database_path", &self.database_path)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DEVELOPER_PASSWORD", "hunter2"),
            ("SECRET_KEY", "cookie-secret"),
        ]))
        .unwrap();

        assert_eq!(config.developer_password, "hunter2");
        assert_eq!(config.session_secret, "cookie-secret");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.session_ttl, DEFAULT_SESSION_TTL);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DEVELOPER_PASSWORD", "hunter2"),
            ("SECRET_KEY", "cookie-secret"),
            ("PORT", "8081"),
            ("DATABASE_PATH", "/tmp/round.db"),
            ("SESSION_TTL_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.database_path, PathBuf::from("/tmp/round.db"));
        assert_eq!(config.session_ttl, Duration::from_secs(60));
    }

    #[test]
    fn required_secrets_must_be_present_and_non_empty() {
        let err = AppConfig::from_lookup(lookup(&[("SECRET_KEY", "s")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DEVELOPER_PASSWORD"));

        let err = AppConfig::from_lookup(lookup(&[
            ("DEVELOPER_PASSWORD", "pw"),
            ("SECRET_KEY", "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SECRET_KEY"));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DEVELOPER_PASSWORD", "pw"),
            ("SECRET_KEY", "s"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err = AppConfig::from_lookup(lookup(&[
            ("DEVELOPER_PASSWORD", "pw"),
            ("SECRET_KEY", "s"),
            ("SESSION_TTL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "SESSION_TTL_SECS",
                ..
            }
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DEVELOPER_PASSWORD", "hunter2"),
            ("SECRET_KEY", "cookie-secret"),
        ]))
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("cookie-secret"));
    }
}
