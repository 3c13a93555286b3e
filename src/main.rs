/// MatchdayLive - Live Notifier
///
/// Co dělá:
///   1. Stáhne kalendář soutěže z FIFA API a vybere LIVE zápasy
///   2. Nový LIVE zápas uloží do cache a pošle "is live!" zprávu
///   3. Pro každý zápas v cache projde timeline a nahlásí nové události
///      (góly, karty, penalty, začátky a konce period)
///   4. Posune watermark, uloží cache, počká na doručení zpráv
///
/// Bez POLL_INTERVAL_SECS proběhne jeden cyklus (cron styl), s ním běží ve smyčce.
///
/// Spuštění:
///   cargo run --bin live-notifier

mod config;

use anyhow::{Context, Result};
use config::{CacheBackend, Config, SinkKind};
use dotenv::dotenv;
use fifa_feed::FifaClient;
use logger::EventLogger;
use match_tracker::{JsonFileStore, MatchStore, MatchTracker, SqliteStore, TrackerSettings};
use notifier::{ConsoleSink, Dispatcher, DispatcherConfig, NotificationSink, NtfySink, SlackSink};
use std::env;
use std::fs::File;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cfg = Config::from_env().context("invalid configuration")?;

    info!("=== MatchdayLive Notifier ===");
    info!("Competition {} / season {}", cfg.competition_id, cfg.season_id);
    info!("Sink: {} (max {}/s)", cfg.sink_name(), cfg.max_per_sec);
    info!("Logs: {}", cfg.log_dir.display());

    // Single instance lock
    let lock_file_path = env::temp_dir().join("matchday_live_notifier.lock");
    let lock_file = match File::create(&lock_file_path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to create lock file at {:?}: {}", lock_file_path, e);
            return Ok(());
        }
    };

    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => {
            info!("Acquired single-instance lock.");
            guard
        }
        Err(_) => {
            warn!("Another instance of live-notifier is already running! Exiting.");
            return Ok(());
        }
    };

    let store = open_store(&cfg)?;
    info!("Cache: {}", store.describe());

    let audit = EventLogger::new(&cfg.log_dir);
    let tracker = MatchTracker::new(
        Arc::new(FifaClient::new(cfg.api_base.as_str())),
        store,
        TrackerSettings {
            competition_id:       cfg.competition_id.clone(),
            season_id:            cfg.season_id.clone(),
            announce_feed_loaded: cfg.announce_feed_loaded,
        },
        Some(audit.clone()),
    );
    let dispatcher = Dispatcher::spawn(
        build_sink(&cfg.sink),
        DispatcherConfig {
            queue_capacity: cfg.queue_capacity,
            max_per_sec:    cfg.max_per_sec,
        },
        Some(audit),
    );

    let outcome = match cfg.poll_interval {
        None => tracker.poll_once(&dispatcher).await.map(|_| ()),
        Some(interval) => {
            info!("Poll interval: {}s", interval.as_secs());
            loop {
                if let Err(e) = tracker.poll_once(&dispatcher).await {
                    // další cyklus to zkusí znovu, watermarky drží
                    error!("Poll cycle failed: {e}");
                }
                tokio::select! {
                    _ = sleep(interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("Ctrl-C, shutting down");
                        break Ok(());
                    }
                }
            }
        }
    };

    // fronta se dopíše i když cyklus selhal
    let report = dispatcher.finish().await;
    info!(delivered = report.delivered, failed = report.failed, "Dispatcher drained");

    outcome.context("poll cycle failed")
}

fn open_store(cfg: &Config) -> Result<Box<dyn MatchStore>> {
    Ok(match cfg.cache_backend {
        CacheBackend::Json => Box::new(JsonFileStore::new(&cfg.cache_path)),
        CacheBackend::Sqlite => Box::new(
            SqliteStore::open(&cfg.cache_path)
                .with_context(|| format!("open sqlite cache at {}", cfg.cache_path.display()))?,
        ),
    })
}

fn build_sink(kind: &SinkKind) -> Arc<dyn NotificationSink> {
    match kind {
        SinkKind::Slack { token, channel } => Arc::new(SlackSink::new(token.as_str(), channel.as_str())),
        SinkKind::Ntfy { base_url, topic } => Arc::new(NtfySink::new(base_url, topic)),
        SinkKind::Console => Arc::new(ConsoleSink),
    }
}
