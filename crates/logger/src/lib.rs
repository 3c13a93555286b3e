//! MatchdayLive - Logger
//! JSONL audit stream (jeden soubor na den)

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }

    pub fn log_dir(&self) -> &std::path::Path {
        &self.log_dir
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event typy ────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct MatchLiveEvent {
    pub ts:        String,
    pub event:     &'static str,   // "MATCH_LIVE"
    pub match_id:  String,
    pub stage_id:  String,
    pub home:      String,
    pub away:      String,
    pub score:     String,
}

#[derive(Serialize, Debug)]
pub struct FeedStatusEvent {
    pub ts:           String,
    pub event:        &'static str,   // "FEED_STATUS"
    pub source:       String,         // "fifa_calendar" | "fifa_timeline"
    pub scope:        String,         // competition/season or match id
    pub ok:           bool,
    pub message:      String,
    pub items:        usize,
}

#[derive(Serialize, Debug)]
pub struct NotificationEvent {
    pub ts:        String,
    pub event:     &'static str,   // "NOTIFICATION_SENT" | "NOTIFICATION_FAILED"
    pub sink:      String,
    pub match_id:  Option<String>,
    pub text:      String,
    pub error:     Option<String>,
}

#[derive(Serialize, Debug)]
pub struct PollCycleEvent {
    pub ts:               String,
    pub event:            &'static str,   // "POLL_CYCLE"
    pub competition_id:   String,
    pub season_id:        String,
    pub snapshots:        usize,
    pub live_matches:     usize,
    pub new_matches:      usize,
    pub tracked_matches:  usize,
    pub notifications:    usize,
    pub ok:               bool,
}
