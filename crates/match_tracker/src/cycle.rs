use chrono::{DateTime, Utc};
use fifa_feed::{FetchError, MatchDataSource};
use logger::{now_iso, EventLogger, FeedStatusEvent, MatchLiveEvent, PollCycleEvent};
use notifier::{Dispatcher, Icon, Notification};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::discovery::discover;
use crate::store::{MatchStore, StoreError};
use crate::timeline::{next_watermark, process_timeline};

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("match list fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("timeline fetch failed for match {match_id}: {source}")]
    Timeline {
        match_id: String,
        #[source]
        source:   FetchError,
    },

    #[error("match store failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub competition_id:       String,
    pub season_id:            String,
    /// Post "Data loaded from FIFA." once the match list is in.
    pub announce_feed_loaded: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub snapshots:         usize,
    pub live:              usize,
    pub added:             usize,
    pub tracked:           usize,
    /// Messages handed to the dispatcher (delivery is reported by the dispatcher).
    pub queued:            usize,
    pub watermarks_moved:  usize,
    pub skipped_no_stage:  usize,
}

/// Jeden poll cyklus: kalendář -> discovery -> timeline každého zápasu v cache.
pub struct MatchTracker {
    source:   Arc<dyn MatchDataSource>,
    store:    Box<dyn MatchStore>,
    settings: TrackerSettings,
    audit:    Option<EventLogger>,
}

impl MatchTracker {
    pub fn new(
        source:   Arc<dyn MatchDataSource>,
        store:    Box<dyn MatchStore>,
        settings: TrackerSettings,
        audit:    Option<EventLogger>,
    ) -> Self {
        Self { source, store, settings, audit }
    }

    pub fn store(&self) -> &dyn MatchStore {
        self.store.as_ref()
    }

    pub async fn poll_once(&self, dispatcher: &Dispatcher) -> Result<CycleReport, CycleError> {
        self.poll_at(dispatcher, Utc::now()).await
    }

    /// Runs one cycle with `now` as the watermark for newly discovered matches.
    ///
    /// The store is saved after discovery and again after the timelines. A
    /// failed match-list fetch aborts before anything is mutated; a failed
    /// timeline fetch saves the watermarks advanced so far and aborts.
    pub async fn poll_at(&self, dispatcher: &Dispatcher, now: DateTime<Utc>) -> Result<CycleReport, CycleError> {
        let s = &self.settings;
        let mut report = CycleReport::default();
        let mut cache = self.store.load()?;

        let snapshots = match self.source.fetch_matches(&s.competition_id, &s.season_id).await {
            Ok(snapshots) => {
                self.log_feed("fifa_calendar", &format!("{}/{}", s.competition_id, s.season_id), None, snapshots.len());
                snapshots
            }
            Err(e) => {
                self.log_feed("fifa_calendar", &format!("{}/{}", s.competition_id, s.season_id), Some(&e), 0);
                self.log_cycle(&report, false);
                return Err(e.into());
            }
        };
        report.snapshots = snapshots.len();

        if s.announce_feed_loaded {
            self.queue(dispatcher, Notification::new(Icon::Info, "Data loaded from FIFA.")).await;
            report.queued += 1;
        }

        // ── Discovery ────────────────────────────────────────────────────────
        let found = discover(&snapshots, &mut cache, now);
        report.live = found.live;
        report.added = found.added.len();
        for id in &found.added {
            if let Some(r) = cache.get(id) {
                self.log_audit(&MatchLiveEvent {
                    ts:       now_iso(),
                    event:    "MATCH_LIVE",
                    match_id: r.id.clone(),
                    stage_id: r.stage_id.clone().unwrap_or_default(),
                    home:     r.home_team_name.clone(),
                    away:     r.away_team_name.clone(),
                    score:    r.score.clone(),
                });
            }
        }
        self.store.save(&cache)?;

        for n in found.notifications {
            self.queue(dispatcher, n).await;
            report.queued += 1;
        }

        // ── Timelines ────────────────────────────────────────────────────────
        report.tracked = cache.len();
        for id in cache.ids() {
            let Some(record) = cache.get(&id).cloned() else { continue };
            let Some(stage_id) = record.stage_id.as_deref() else {
                warn!("Match {id} has no stage id, timeline skipped");
                report.skipped_no_stage += 1;
                continue;
            };
            info!("Match {id} loaded from cache ({})", record.fixture());

            let events = match self.source
                .fetch_timeline(&s.competition_id, &s.season_id, stage_id, &id)
                .await
            {
                Ok(events) => {
                    self.log_feed("fifa_timeline", &id, None, events.len());
                    events
                }
                Err(source) => {
                    self.log_feed("fifa_timeline", &id, Some(&source), 0);
                    self.store.save(&cache)?;
                    self.log_cycle(&report, false);
                    return Err(CycleError::Timeline { match_id: id, source });
                }
            };

            for n in process_timeline(&record, &events) {
                self.queue(dispatcher, n).await;
                report.queued += 1;
            }

            if let Some(ts) = next_watermark(&record, &events) {
                if cache.advance_watermark(&id, ts) {
                    report.watermarks_moved += 1;
                }
            }
        }

        self.store.save(&cache)?;
        self.log_cycle(&report, true);

        info!(
            live = report.live,
            added = report.added,
            tracked = report.tracked,
            queued = report.queued,
            "Cycle completed"
        );
        Ok(report)
    }

    async fn queue(&self, dispatcher: &Dispatcher, notification: Notification) {
        if let Err(e) = dispatcher.dispatch(notification).await {
            warn!("Notification dropped: {e}");
        }
    }

    fn log_audit<T: serde::Serialize>(&self, event: &T) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log(event) {
                warn!("Log write failed: {e}");
            }
        }
    }

    fn log_feed(&self, source: &str, scope: &str, error: Option<&FetchError>, items: usize) {
        self.log_audit(&FeedStatusEvent {
            ts:      now_iso(),
            event:   "FEED_STATUS",
            source:  source.to_string(),
            scope:   scope.to_string(),
            ok:      error.is_none(),
            message: error.map(|e| e.to_string()).unwrap_or_else(|| "ok".to_string()),
            items,
        });
    }

    fn log_cycle(&self, report: &CycleReport, ok: bool) {
        self.log_audit(&PollCycleEvent {
            ts:              now_iso(),
            event:           "POLL_CYCLE",
            competition_id:  self.settings.competition_id.clone(),
            season_id:       self.settings.season_id.clone(),
            snapshots:       report.snapshots,
            live_matches:    report.live,
            new_matches:     report.added,
            tracked_matches: report.tracked,
            notifications:   report.queued,
            ok,
        });
    }
}
