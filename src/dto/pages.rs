//! HTML pages rendered by the request handlers.

use askama::Template;
use axum::response::Html;

use crate::{
    dao::models::{CipherEntity, GuessEntity},
    dto::format_system_time,
    error::ServiceError,
    state::round::RoundStats,
};

/// Landing page with the guess form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    /// Participants so far.
    pub count: u64,
}

/// Confirmation after a guess was recorded.
#[derive(Template)]
#[template(path = "thank_you.html")]
pub struct ThankYouPage {
    /// Participants including the new guess.
    pub count: u64,
}

/// Password prompt in front of a privileged listing.
#[derive(Template)]
#[template(path = "password.html")]
pub struct PasswordPage {
    /// Page heading.
    pub title: &'static str,
    /// Route the form posts to.
    pub action: &'static str,
}

/// Final statistics, chart and winner of a finished round.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsPage {
    /// Statistics of the closed round.
    pub stats: RoundStats,
    /// Histogram chart as a data URI.
    pub chart_uri: String,
}

/// Short informational page, e.g. when a round has no guesses.
#[derive(Template)]
#[template(path = "message.html")]
pub struct MessagePage {
    /// Text shown to the visitor.
    pub message: String,
}

/// Every guess of the running round, highest first.
#[derive(Template)]
#[template(path = "full_result.html")]
pub struct FullResultPage {
    /// Guesses, highest first.
    pub rows: Vec<GuessRow>,
    /// Live statistics; `None` while the round is empty.
    pub stats: Option<RoundStats>,
}

/// Cipher submission form.
#[derive(Template)]
#[template(path = "cipher.html")]
pub struct CipherPage {
    /// Route the form posts to.
    pub action: &'static str,
}

/// Confirmation after a cipher entry was recorded.
#[derive(Template)]
#[template(path = "cipher_thank_you.html")]
pub struct CipherThankYouPage {
    /// Trimmed participant name.
    pub name: String,
}

/// Every cipher entry ever submitted.
#[derive(Template)]
#[template(path = "cipher_full.html")]
pub struct CipherFullPage {
    /// Answers in submission order.
    pub rows: Vec<CipherRow>,
}

/// Table row for a guess.
pub struct GuessRow {
    /// Row id, posted back by the delete form.
    pub id: i64,
    /// Participant name.
    pub name: String,
    /// Submitted value.
    pub guess: u8,
    /// Submission time, RFC 3339.
    pub created_at: String,
}

impl From<GuessEntity> for GuessRow {
    fn from(entry: GuessEntity) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            guess: entry.guess.value(),
            created_at: format_system_time(entry.created_at),
        }
    }
}

/// Table row for a cipher entry.
pub struct CipherRow {
    /// Row id.
    pub id: i64,
    /// Participant name.
    pub name: String,
    /// Answer text as typed.
    pub guess: String,
    /// Submission time, RFC 3339.
    pub created_at: String,
}

impl From<CipherEntity> for CipherRow {
    fn from(entry: CipherEntity) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            guess: entry.guess,
            created_at: format_system_time(entry.created_at),
        }
    }
}

/// Render a page into an HTML response body.
pub fn render<T: Template>(page: &T) -> Result<Html<String>, ServiceError> {
    page.render()
        .map(Html)
        .map_err(|err| ServiceError::Render(err.to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::state::round::Guess;

    #[test]
    fn user_supplied_text_is_escaped() {
        let page = CipherFullPage {
            rows: vec![CipherRow::from(CipherEntity {
                id: 1,
                name: "<script>alert(1)</script>".into(),
                guess: "a & b".into(),
                created_at: SystemTime::UNIX_EPOCH,
            })],
        };
        let html = render(&page).unwrap().0;

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn results_page_shows_winner_and_chart() {
        let page = ResultsPage {
            stats: RoundStats {
                participants: 3,
                average: 50.0,
                target: 100.0 / 3.0,
                winner_name: "B".into(),
                winner_guess: Guess::try_from(50_i64).unwrap(),
            },
            chart_uri: "data:image/png;base64,AAAA".into(),
        };
        let html = render(&page).unwrap().0;

        assert!(html.contains("50.00"));
        assert!(html.contains("33.33"));
        assert!(html.contains("data:image/png;base64,AAAA"));
        assert!(html.contains("B"));
    }

    #[test]
    fn full_listing_offers_delete_per_row() {
        let page = FullResultPage {
            rows: vec![GuessRow {
                id: 42,
                name: "Ada".into(),
                guess: 17,
                created_at: "1970-01-01T00:00:00Z".into(),
            }],
            stats: None,
        };
        let html = render(&page).unwrap().0;

        assert!(html.contains(r#"name="entry_id" value="42""#));
        assert!(html.contains("Ada"));
    }
}
