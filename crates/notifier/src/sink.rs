use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::{DispatchError, Notification};

pub const SLACK_API_BASE: &str = "https://slack.com/api";
pub const NTFY_BASE: &str = "https://ntfy.sh";

/// Human-facing channel. The channel identity is fixed when the sink is built.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError>;
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

async fn reject_unless_success(resp: reqwest::Response) -> Result<reqwest::Response, DispatchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body: String = resp.text().await.unwrap_or_default().chars().take(200).collect();
    Err(DispatchError::Rejected { status: status.as_u16(), body })
}

// ── Slack ────────────────────────────────────────────────────────────────────

pub struct SlackSink {
    client:   reqwest::Client,
    api_base: String,
    token:    String,
    channel:  String,
}

impl SlackSink {
    pub fn new(token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::with_api_base(SLACK_API_BASE, token, channel)
    }

    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            client:   http_client(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token:    token.into(),
            channel:  channel.into(),
        }
    }
}

/// Slack answers HTTP 200 even for failed posts; the verdict is in `ok`.
pub(crate) fn check_slack_response(body: &serde_json::Value) -> Result<(), DispatchError> {
    if body["ok"].as_bool() == Some(true) {
        return Ok(());
    }
    let reason = body["error"].as_str().unwrap_or("unknown_error");
    Err(DispatchError::Api(reason.to_string()))
}

#[async_trait]
impl NotificationSink for SlackSink {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        let url = format!("{}/chat.postMessage", self.api_base);
        let body = serde_json::json!({
            "channel": self.channel,
            "text": notification.render(),
        });
        let resp = self.client.post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let resp = reject_unless_success(resp).await?;
        let parsed: serde_json::Value = resp.json().await?;
        check_slack_response(&parsed)
    }
}

// ── ntfy ─────────────────────────────────────────────────────────────────────

pub struct NtfySink {
    client: reqwest::Client,
    url:    String,
}

impl NtfySink {
    pub fn new(base_url: &str, topic: &str) -> Self {
        Self {
            client: http_client(),
            url:    format!("{}/{}", base_url.trim_end_matches('/'), topic),
        }
    }
}

#[async_trait]
impl NotificationSink for NtfySink {
    fn name(&self) -> &'static str {
        "ntfy"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        // ntfy si z tagu udělá emoji sám
        let resp = self.client
            .post(&self.url)
            .header("Title", "Matchday Live")
            .header("Tags", notification.icon.shortcode())
            .body(notification.text.clone())
            .send()
            .await?;
        reject_unless_success(resp).await?;
        Ok(())
    }
}

// ── Console (dry run) ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        info!(target: "console_sink", "{}", notification.render());
        Ok(())
    }
}
