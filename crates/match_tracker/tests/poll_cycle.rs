use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fifa_feed::{FetchError, LocalizedText, MatchDataSource, MatchSnapshot, RawEvent, TeamSnapshot};
use logger::EventLogger;
use match_tracker::{CycleError, JsonFileStore, MatchStore, MatchTracker, SqliteStore, TrackerSettings};
use notifier::{DispatchError, Dispatcher, DispatcherConfig, Notification, NotificationSink};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::{Arc, Mutex};

// ── Fakes ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeSource {
    matches:         Mutex<Vec<MatchSnapshot>>,
    timelines:       Mutex<HashMap<String, Vec<RawEvent>>>,
    calendar_down:   Mutex<bool>,
    failing_match:   Mutex<Option<String>>,
    timeline_calls:  Mutex<Vec<String>>,
}

fn outage(url: &str) -> FetchError {
    FetchError::Status { url: url.to_string(), status: 503, body: "maintenance".to_string() }
}

#[async_trait]
impl MatchDataSource for FakeSource {
    async fn fetch_matches(&self, _competition_id: &str, _season_id: &str) -> Result<Vec<MatchSnapshot>, FetchError> {
        if *self.calendar_down.lock().unwrap() {
            return Err(outage("calendar"));
        }
        Ok(self.matches.lock().unwrap().clone())
    }

    async fn fetch_timeline(
        &self,
        _competition_id: &str,
        _season_id:      &str,
        _stage_id:       &str,
        match_id:        &str,
    ) -> Result<Vec<RawEvent>, FetchError> {
        self.timeline_calls.lock().unwrap().push(match_id.to_string());
        if self.failing_match.lock().unwrap().as_deref() == Some(match_id) {
            return Err(outage(match_id));
        }
        Ok(self.timelines.lock().unwrap().get(match_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingSink {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        self.seen.lock().unwrap().push(notification.render());
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 11, 20, 16, 0, 0).unwrap()
}

fn team(id: &str, name: &str) -> TeamSnapshot {
    TeamSnapshot {
        id_team:   id.into(),
        team_name: vec![LocalizedText { locale: Some("en-GB".into()), description: name.into() }],
        score:     Some(0),
    }
}

fn snap(id: &str, status: u32, home: &str, away: &str) -> MatchSnapshot {
    MatchSnapshot {
        id_match:     id.into(),
        id_stage:     Some("285063".into()),
        match_status: Some(status),
        home:         Some(team("1", home)),
        away:         Some(team("2", away)),
    }
}

fn ev(type_code: u32, period: u32, secs: i64, minute: &str) -> RawEvent {
    RawEvent {
        type_code,
        period_code:  Some(period),
        timestamp:    t0() + Duration::seconds(secs),
        match_minute: Some(minute.into()),
        id_team:      None,
    }
}

fn settings() -> TrackerSettings {
    TrackerSettings {
        competition_id:       "17".into(),
        season_id:            "255711".into(),
        announce_feed_loaded: false,
    }
}

fn fast() -> DispatcherConfig {
    DispatcherConfig {
        queue_capacity: 16,
        max_per_sec:    NonZeroU32::new(10_000).unwrap(),
    }
}

fn tracker(source: &Arc<FakeSource>, cache: &Path) -> MatchTracker {
    MatchTracker::new(source.clone(), Box::new(JsonFileStore::new(cache)), settings(), None)
}

async fn drain(dispatcher: Dispatcher, sink: &RecordingSink) -> Vec<String> {
    dispatcher.finish().await;
    std::mem::take(&mut *sink.seen.lock().unwrap())
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_live_match_is_announced_once() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache.json");
    let source = Arc::new(FakeSource::default());
    *source.matches.lock().unwrap() = vec![
        snap("400128081", 0, "Senegal", "Netherlands"),
        snap("400128082", 3, "Qatar", "Ecuador"),
        snap("400128083", 1, "England", "Iran"),
    ];
    let sink = Arc::new(RecordingSink::default());

    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    let report = tracker(&source, &cache).poll_at(&dispatcher, t0()).await.unwrap();
    assert_eq!(report.snapshots, 3);
    assert_eq!(report.live, 1);
    assert_eq!(report.added, 1);
    assert_eq!(report.tracked, 1);
    assert_eq!(drain(dispatcher, &sink).await, vec![":zap: Match 400128082 is live! Qatar vs Ecuador"]);

    // druhý cyklus se stejným kalendářem nic nepřidá
    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    let report = tracker(&source, &cache).poll_at(&dispatcher, t0() + Duration::seconds(30)).await.unwrap();
    assert_eq!(report.added, 0);
    assert_eq!(report.tracked, 1);
    assert!(drain(dispatcher, &sink).await.is_empty());

    let stored = JsonFileStore::new(&cache).load().unwrap();
    assert_eq!(stored.get("400128082").unwrap().watermark, t0());
}

#[tokio::test]
async fn timeline_events_are_reported_once_in_feed_order() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache.json");
    let source = Arc::new(FakeSource::default());
    *source.matches.lock().unwrap() = vec![snap("400128082", 3, "Qatar", "Ecuador")];
    source.timelines.lock().unwrap().insert("400128082".into(), vec![
        ev(7, 3, -5, "0'"),   // před objevením zápasu
        ev(7, 3, 1, "0'"),
        ev(5, 3, 2, "10'"),   // střídání, bez zprávy
        ev(0, 3, 3, "16'"),
        ev(2, 3, 4, "22'"),
    ]);
    let sink = Arc::new(RecordingSink::default());

    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    let report = tracker(&source, &cache).poll_at(&dispatcher, t0()).await.unwrap();
    assert_eq!(report.queued, 4);
    assert_eq!(report.watermarks_moved, 1);
    assert_eq!(drain(dispatcher, &sink).await, vec![
        ":zap: Match 400128082 is live! Qatar vs Ecuador",
        ":zap: Match Starting - Qatar v. Ecuador",
        ":soccer: Goal - 16' - Qatar v. Ecuador",
        ":soccer: Yellow Card - 22' - Qatar v. Ecuador",
    ]);

    // restart procesu: nový tracker nad stejným souborem, feed vrací totéž + jednu novou událost
    source.timelines.lock().unwrap().get_mut("400128082").unwrap().push(ev(8, 3, 600, "45'+3'"));
    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    let report = tracker(&source, &cache).poll_at(&dispatcher, t0() + Duration::minutes(1)).await.unwrap();
    assert_eq!(report.queued, 1);
    assert_eq!(drain(dispatcher, &sink).await, vec![":zap: End of 1st Half - Qatar v. Ecuador"]);

    let stored = JsonFileStore::new(&cache).load().unwrap();
    assert_eq!(stored.get("400128082").unwrap().watermark, t0() + Duration::seconds(600));
}

#[tokio::test]
async fn calendar_outage_leaves_cache_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache.json");
    let source = Arc::new(FakeSource::default());
    *source.matches.lock().unwrap() = vec![snap("400128082", 3, "Qatar", "Ecuador")];
    *source.calendar_down.lock().unwrap() = true;
    let sink = Arc::new(RecordingSink::default());

    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    let err = tracker(&source, &cache).poll_at(&dispatcher, t0()).await.unwrap_err();
    assert!(matches!(err, CycleError::Fetch(FetchError::Status { status: 503, .. })));
    assert!(drain(dispatcher, &sink).await.is_empty());
    assert!(!cache.exists());
    assert!(source.timeline_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn timeline_outage_keeps_earlier_progress() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache.json");
    let source = Arc::new(FakeSource::default());
    *source.matches.lock().unwrap() = vec![
        snap("400128082", 3, "Qatar", "Ecuador"),
        snap("400128090", 3, "USA", "Wales"),
    ];
    source.timelines.lock().unwrap().insert("400128082".into(), vec![ev(0, 3, 60, "1'")]);
    *source.failing_match.lock().unwrap() = Some("400128090".into());
    let sink = Arc::new(RecordingSink::default());

    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    let err = tracker(&source, &cache).poll_at(&dispatcher, t0()).await.unwrap_err();
    match err {
        CycleError::Timeline { match_id, .. } => assert_eq!(match_id, "400128090"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(drain(dispatcher, &sink).await, vec![
        ":zap: Match 400128082 is live! Qatar vs Ecuador",
        ":zap: Match 400128090 is live! USA vs Wales",
        ":soccer: Goal - 1' - Qatar v. Ecuador",
    ]);

    let stored = JsonFileStore::new(&cache).load().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.get("400128082").unwrap().watermark, t0() + Duration::seconds(60));
    assert_eq!(stored.get("400128090").unwrap().watermark, t0());
}

#[tokio::test]
async fn match_without_stage_is_tracked_but_not_polled() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FakeSource::default());
    let mut s = snap("400128082", 3, "Qatar", "Ecuador");
    s.id_stage = None;
    *source.matches.lock().unwrap() = vec![s];
    let sink = Arc::new(RecordingSink::default());

    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    let report = tracker(&source, &dir.path().join("cache.json")).poll_at(&dispatcher, t0()).await.unwrap();
    assert_eq!(report.tracked, 1);
    assert_eq!(report.skipped_no_stage, 1);
    assert!(source.timeline_calls.lock().unwrap().is_empty());
    assert_eq!(drain(dispatcher, &sink).await.len(), 1);
}

#[tokio::test]
async fn existing_cache_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache.json");
    std::fs::write(&cache, r#"{
        "400128082": {
            "id": "400128082",
            "status": 3,
            "stageId": "285063",
            "homeTeamId": "43834",
            "awayTeamId": "43855",
            "homeTeamName": "Qatar",
            "awayTeamName": "Ecuador",
            "lastUpdate": "2022-11-20T16:10:00Z",
            "score": "Qatar 0 - 0 Ecuador"
        }
    }"#).unwrap();

    let source = Arc::new(FakeSource::default());
    *source.matches.lock().unwrap() = vec![snap("400128082", 3, "Qatar", "Ecuador")];
    source.timelines.lock().unwrap().insert("400128082".into(), vec![
        ev(0, 3, 300, "5'"),
        ev(0, 3, 900, "15'"),
    ]);
    let sink = Arc::new(RecordingSink::default());

    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    let report = tracker(&source, &cache).poll_at(&dispatcher, t0() + Duration::minutes(20)).await.unwrap();
    assert_eq!(report.added, 0);
    assert_eq!(drain(dispatcher, &sink).await, vec![":soccer: Goal - 15' - Qatar v. Ecuador"]);
}

#[tokio::test]
async fn sqlite_backend_and_audit_stream() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let source = Arc::new(FakeSource::default());
    *source.matches.lock().unwrap() = vec![snap("400128082", 3, "Qatar", "Ecuador")];
    source.timelines.lock().unwrap().insert("400128082".into(), vec![ev(0, 3, 60, "1'")]);
    let sink = Arc::new(RecordingSink::default());

    let store = SqliteStore::open(dir.path().join("cache.db")).unwrap();
    let settings = TrackerSettings { announce_feed_loaded: true, ..settings() };
    let tracker = MatchTracker::new(source.clone(), Box::new(store), settings, Some(EventLogger::new(&logs)));

    let dispatcher = Dispatcher::spawn(sink.clone(), fast(), None);
    tracker.poll_at(&dispatcher, t0()).await.unwrap();
    assert_eq!(drain(dispatcher, &sink).await, vec![
        ":information_source: Data loaded from FIFA.",
        ":zap: Match 400128082 is live! Qatar vs Ecuador",
        ":soccer: Goal - 1' - Qatar v. Ecuador",
    ]);
    assert_eq!(tracker.store().load().unwrap().get("400128082").unwrap().watermark, t0() + Duration::seconds(60));

    let file = std::fs::read_dir(&logs).unwrap().next().unwrap().unwrap().path();
    let raw = std::fs::read_to_string(file).unwrap();
    let events: Vec<String> = raw
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["event"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(events, vec!["FEED_STATUS", "MATCH_LIVE", "FEED_STATUS", "POLL_CYCLE"]);
}
