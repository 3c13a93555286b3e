use async_trait::async_trait;
use tracing::{debug, warn};

use crate::types::{parse_calendar, parse_timeline, MatchSnapshot, RawEvent};
use crate::{FetchError, MatchDataSource};

pub const FIFA_API_BASE: &str = "https://api.fifa.com/api/v1";

/// Kolik zápasů si řekneme v jednom kalendářním dotazu (celý turnaj se vejde)
const CALENDAR_PAGE_SIZE: u32 = 500;

pub struct FifaClient {
    client:   reqwest::Client,
    base_url: String,
}

impl FifaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("matchday-live/", env!("CARGO_PKG_VERSION")))
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn calendar_url(&self, competition_id: &str, season_id: &str) -> String {
        format!(
            "{}/calendar/matches?idCompetition={}&idSeason={}&count={}",
            self.base_url, competition_id, season_id, CALENDAR_PAGE_SIZE
        )
    }

    pub fn timeline_url(&self, competition_id: &str, season_id: &str, stage_id: &str, match_id: &str) -> String {
        format!(
            "{}/timelines/{}/{}/{}/{}?language=en",
            self.base_url, competition_id, season_id, stage_id, match_id
        )
    }

    async fn get_body(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: String = resp.text().await.unwrap_or_default().chars().take(200).collect();
            warn!("FIFA API {url} status {status}: {body}");
            return Err(FetchError::Status {
                url:    url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp.text().await?;
        debug!("FIFA raw (first 300): {}", raw.chars().take(300).collect::<String>());
        Ok(raw)
    }
}

impl Default for FifaClient {
    fn default() -> Self {
        Self::new(FIFA_API_BASE)
    }
}

#[async_trait]
impl MatchDataSource for FifaClient {
    async fn fetch_matches(&self, competition_id: &str, season_id: &str) -> Result<Vec<MatchSnapshot>, FetchError> {
        let url = self.calendar_url(competition_id, season_id);
        let raw = self.get_body(&url).await?;
        parse_calendar(&raw).map_err(|source| FetchError::Decode { url, source })
    }

    async fn fetch_timeline(
        &self,
        competition_id: &str,
        season_id:      &str,
        stage_id:       &str,
        match_id:       &str,
    ) -> Result<Vec<RawEvent>, FetchError> {
        let url = self.timeline_url(competition_id, season_id, stage_id, match_id);
        let raw = self.get_body(&url).await?;
        parse_timeline(&raw).map_err(|source| FetchError::Decode { url, source })
    }
}
