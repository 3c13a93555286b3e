//! MatchdayLive - Notifier
//!
//! Zprávy pro lidi: Slack (výchozí), ntfy push, nebo jen konzole.
//! `Dispatcher` je jediný worker s ohraničenou frontou, takže pořadí zpráv
//! odpovídá pořadí událostí a pomalý sink nezdrží zpracování dalších zápasů.

mod dispatcher;
mod notification;
mod sink;

use thiserror::Error;

pub use dispatcher::{DispatchReport, Dispatcher, DispatcherConfig};
pub use notification::{Icon, Notification};
pub use sink::{ConsoleSink, NotificationSink, NtfySink, SlackSink, NTFY_BASE, SLACK_API_BASE};

/// Per-message delivery failure. Reported, never retried here.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sink rejected message with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("sink API error: {0}")]
    Api(String),

    #[error("dispatch queue closed")]
    QueueClosed,
}
