use chrono::{DateTime, Utc};
use fifa_feed::{MatchSnapshot, TeamSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stav jednoho živého zápasu mezi cykly.
///
/// Field names match the `cache.json` files written by the earlier
/// poller, so an existing cache keeps working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id:             String,
    #[serde(default)]
    pub status:         Option<u32>,
    #[serde(default)]
    pub stage_id:       Option<String>,
    pub home_team_id:   String,
    pub away_team_id:   String,
    pub home_team_name: String,
    pub away_team_name: String,
    /// Events at or before this instant are not new.
    #[serde(rename = "lastUpdate")]
    pub watermark:      DateTime<Utc>,
    #[serde(default)]
    pub score:          String,
}

fn team_name(team: Option<&TeamSnapshot>) -> String {
    match team.map(TeamSnapshot::display_name) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "TBD".to_string(),
    }
}

impl MatchRecord {
    pub fn from_snapshot(snapshot: &MatchSnapshot, watermark: DateTime<Utc>) -> Self {
        let home = snapshot.home.as_ref();
        let away = snapshot.away.as_ref();
        let home_team_name = team_name(home);
        let away_team_name = team_name(away);
        let goals = |t: Option<&TeamSnapshot>| t.and_then(|t| t.score).unwrap_or(0);

        Self {
            id:           snapshot.id_match.clone(),
            status:       snapshot.match_status,
            stage_id:     snapshot.id_stage.clone(),
            home_team_id: home.map(|t| t.id_team.clone()).unwrap_or_default(),
            away_team_id: away.map(|t| t.id_team.clone()).unwrap_or_default(),
            score: format!(
                "{} {} - {} {}",
                home_team_name, goals(home), goals(away), away_team_name
            ),
            home_team_name,
            away_team_name,
            watermark,
        }
    }

    /// "Home v. Away", the suffix every timeline message carries.
    pub fn fixture(&self) -> String {
        format!("{} v. {}", self.home_team_name, self.away_team_name)
    }
}

/// In-memory match-state cache, keyed by match id.
///
/// Iteration is ordered by match id, so notification order across matches
/// is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchCache {
    records: BTreeMap<String, MatchRecord>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, match_id: &str) -> Option<&MatchRecord> {
        self.records.get(match_id)
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.records.contains_key(match_id)
    }

    /// First observation wins: returns false (and changes nothing) when the id is known.
    pub fn insert_if_absent(&mut self, record: MatchRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.records.insert(record.id.clone(), record);
        true
    }

    /// Moves the watermark forward only. Returns true when it moved.
    pub fn advance_watermark(&mut self, match_id: &str, to: DateTime<Utc>) -> bool {
        match self.records.get_mut(match_id) {
            Some(record) if to > record.watermark => {
                record.watermark = to;
                true
            }
            _ => false,
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchRecord> {
        self.records.values()
    }
}
