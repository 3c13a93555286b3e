//! Konfigurace z env (po `dotenv`). Vše má default kromě Slack tokenu a kanálu.

use anyhow::{bail, Context, Result};
use fifa_feed::FIFA_API_BASE;
use notifier::NTFY_BASE;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    Slack { token: String, channel: String },
    Ntfy  { base_url: String, topic: String },
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Json,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub competition_id:       String,
    pub season_id:            String,
    pub api_base:             String,
    pub sink:                 SinkKind,
    pub cache_backend:        CacheBackend,
    pub cache_path:           PathBuf,
    pub log_dir:              PathBuf,
    pub max_per_sec:          NonZeroU32,
    pub queue_capacity:       usize,
    /// None = one cycle and exit.
    pub poll_interval:        Option<Duration>,
    pub announce_feed_loaded: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or  = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let sink = match or("NOTIFY_SINK", "slack").to_ascii_lowercase().as_str() {
            "slack" => SinkKind::Slack {
                token:   get("SLACK_TOKEN").context("SLACK_TOKEN is required for NOTIFY_SINK=slack")?,
                channel: get("SLACK_CHANNEL_ID").context("SLACK_CHANNEL_ID is required for NOTIFY_SINK=slack")?,
            },
            "ntfy" => SinkKind::Ntfy {
                base_url: or("NTFY_URL", NTFY_BASE),
                topic:    or("NTFY_TOPIC", "matchday-live"),
            },
            "console" => SinkKind::Console,
            other => bail!("unknown NOTIFY_SINK '{other}' (expected slack, ntfy or console)"),
        };

        let cache_backend = match or("CACHE_BACKEND", "json").to_ascii_lowercase().as_str() {
            "json"   => CacheBackend::Json,
            "sqlite" => CacheBackend::Sqlite,
            other => bail!("unknown CACHE_BACKEND '{other}' (expected json or sqlite)"),
        };
        let default_cache = match cache_backend {
            CacheBackend::Json   => "./cache.json",
            CacheBackend::Sqlite => "./cache.db",
        };

        let max_per_sec = match get("SINK_MAX_PER_SEC") {
            Some(v) => v
                .parse::<NonZeroU32>()
                .with_context(|| format!("SINK_MAX_PER_SEC must be a positive integer, got '{v}'"))?,
            None => NonZeroU32::MIN,
        };

        let queue_capacity = match get("DISPATCH_QUEUE_CAPACITY") {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("DISPATCH_QUEUE_CAPACITY must be an integer, got '{v}'"))?,
            None => 256,
        };

        let poll_interval = match get("POLL_INTERVAL_SECS") {
            Some(v) => {
                let secs = v
                    .parse::<u64>()
                    .with_context(|| format!("POLL_INTERVAL_SECS must be an integer, got '{v}'"))?;
                if secs == 0 {
                    bail!("POLL_INTERVAL_SECS must be greater than zero");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let announce_feed_loaded = match get("ANNOUNCE_FEED_LOADED").map(|v| v.to_ascii_lowercase()) {
            None => false,
            Some(v) => matches!(v.as_str(), "1" | "true" | "yes" | "on"),
        };

        Ok(Self {
            competition_id: or("FIFA_COMPETITION_ID", "17"),
            season_id:      or("FIFA_SEASON_ID", "255711"),
            api_base:       or("FIFA_API_BASE", FIFA_API_BASE),
            sink,
            cache_backend,
            cache_path:     PathBuf::from(or("CACHE_PATH", default_cache)),
            log_dir:        PathBuf::from(or("LOG_DIR", "logs")),
            max_per_sec,
            queue_capacity,
            poll_interval,
            announce_feed_loaded,
        })
    }

    pub fn sink_name(&self) -> &'static str {
        match self.sink {
            SinkKind::Slack { .. } => "slack",
            SinkKind::Ntfy { .. }  => "ntfy",
            SinkKind::Console      => "console",
        }
    }
}
