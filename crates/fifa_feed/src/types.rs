use chrono::{DateTime, Utc};
use serde::Deserialize;

// ── Calendar (GET /calendar/matches) ─────────────────────────────────────────

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarPage {
    #[serde(default)]
    pub results: Vec<MatchSnapshot>,
}

/// Jeden zápas z kalendáře, tak jak ho vrací FIFA API.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct MatchSnapshot {
    pub id_match:     String,
    // Starší payloady posílají "StageId"
    #[serde(default, alias = "StageId")]
    pub id_stage:     Option<String>,
    #[serde(default)]
    pub match_status: Option<u32>,
    #[serde(default)]
    pub home:         Option<TeamSnapshot>,
    #[serde(default)]
    pub away:         Option<TeamSnapshot>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TeamSnapshot {
    #[serde(default)]
    pub id_team:   String,
    #[serde(default)]
    pub team_name: Vec<LocalizedText>,
    #[serde(default)]
    pub score:     Option<u32>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub locale:      Option<String>,
    pub description: String,
}

impl TeamSnapshot {
    /// First localized name, or the team id when the feed has no names yet.
    pub fn display_name(&self) -> &str {
        self.team_name
            .first()
            .map(|t| t.description.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(self.id_team.as_str())
    }
}

// ── Timeline (GET /timelines/{competition}/{season}/{stage}/{match}) ─────────

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct TimelinePage {
    #[serde(default)]
    pub event: Option<Vec<RawEvent>>,
}

/// One timeline entry. Codes are raw feed numbers; see `match_tracker::vocabulary`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RawEvent {
    #[serde(rename = "Type")]
    pub type_code:    u32,
    #[serde(default, rename = "Period")]
    pub period_code:  Option<u32>,
    pub timestamp:    DateTime<Utc>,
    #[serde(default)]
    pub match_minute: Option<String>,
    #[serde(default)]
    pub id_team:      Option<String>,
}

pub fn parse_calendar(raw: &str) -> serde_json::Result<Vec<MatchSnapshot>> {
    let page: CalendarPage = serde_json::from_str(raw)?;
    Ok(page.results)
}

pub fn parse_timeline(raw: &str) -> serde_json::Result<Vec<RawEvent>> {
    let page: TimelinePage = serde_json::from_str(raw)?;
    Ok(page.event.unwrap_or_default())
}
