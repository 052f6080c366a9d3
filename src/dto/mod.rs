use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Form bodies posted by the pages.
pub mod forms;
/// Health check payloads.
pub mod health;
/// Askama page models.
pub mod pages;
/// Input parsing and validation helpers.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
