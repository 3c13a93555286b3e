//! MatchdayLive - FIFA feed
//!
//! Tenký klient nad api.fifa.com:
//!   - kalendář zápasů soutěže/sezóny (`MatchStatus`, týmy, skóre)
//!   - timeline jednoho zápasu (surové číselné kódy událostí)
//!
//! Nic tady neklasifikuje. Kódy překládá `match_tracker::vocabulary`.

mod client;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::{FifaClient, FIFA_API_BASE};
pub use types::{
    parse_calendar, parse_timeline, CalendarPage, LocalizedText, MatchSnapshot, RawEvent,
    TeamSnapshot, TimelinePage,
};

/// Failure to obtain or decode a feed payload. Fatal to the current poll cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait MatchDataSource: Send + Sync {
    async fn fetch_matches(&self, competition_id: &str, season_id: &str) -> Result<Vec<MatchSnapshot>, FetchError>;

    async fn fetch_timeline(
        &self,
        competition_id: &str,
        season_id:      &str,
        stage_id:       &str,
        match_id:       &str,
    ) -> Result<Vec<RawEvent>, FetchError>;
}
