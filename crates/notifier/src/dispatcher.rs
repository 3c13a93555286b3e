use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use logger::{now_iso, EventLogger, NotificationEvent};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{DispatchError, Notification, NotificationSink};

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub queue_capacity: usize,
    /// Token bucket for the sink (Slack chat.postMessage snese ~1 zprávu/s na kanál)
    pub max_per_sec:    NonZeroU32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            max_per_sec:    NonZeroU32::MIN,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed:    usize,
}

/// Fire-and-forget delivery through one worker task.
///
/// The pipeline only waits for queue capacity, never for the sink. A single
/// worker drains the queue, so delivery order equals `dispatch` order.
/// Failed deliveries are logged and counted, never retried.
pub struct Dispatcher {
    tx:     mpsc::Sender<Notification>,
    worker: JoinHandle<DispatchReport>,
}

impl Dispatcher {
    pub fn spawn(
        sink:  Arc<dyn NotificationSink>,
        cfg:   DispatcherConfig,
        audit: Option<EventLogger>,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<Notification>(cfg.queue_capacity.max(1));
        let limiter: DefaultDirectRateLimiter = RateLimiter::direct(Quota::per_second(cfg.max_per_sec));

        let worker = tokio::spawn(async move {
            let mut report = DispatchReport::default();

            while let Some(notification) = rx.recv().await {
                limiter.until_ready().await;
                info!("MSG: {}", notification.render());

                let outcome = sink.send(&notification).await;
                if let Err(e) = &outcome {
                    // nesmí zastavit zbytek fronty
                    warn!(sink = sink.name(), match_id = ?notification.match_id, "Delivery failed: {e}");
                    report.failed += 1;
                } else {
                    report.delivered += 1;
                }

                if let Some(audit) = &audit {
                    let ev = NotificationEvent {
                        ts:       now_iso(),
                        event:    if outcome.is_ok() { "NOTIFICATION_SENT" } else { "NOTIFICATION_FAILED" },
                        sink:     sink.name().to_string(),
                        match_id: notification.match_id.clone(),
                        text:     notification.render(),
                        error:    outcome.err().map(|e| e.to_string()),
                    };
                    if let Err(e) = audit.log(&ev) {
                        warn!("Log write failed: {e}");
                    }
                }
            }

            report
        });

        Self { tx, worker }
    }

    /// Queue one message. Errors only when the worker is gone.
    pub async fn dispatch(&self, notification: Notification) -> Result<(), DispatchError> {
        self.tx.send(notification).await.map_err(|_| DispatchError::QueueClosed)
    }

    /// Close the queue, wait until everything queued so far is delivered (or failed).
    pub async fn finish(self) -> DispatchReport {
        drop(self.tx);
        match self.worker.await {
            Ok(report) => report,
            Err(e) => {
                error!("Dispatcher worker crashed: {e}");
                DispatchReport::default()
            }
        }
    }
}
