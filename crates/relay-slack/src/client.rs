//! Slack incoming-webhook sink.
//!
//! Posts one JSON attachment per notification. Only `200 OK` counts as delivered;
//! there is no retry.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use lifecycle_relay_core::{ComposedMessage, NotificationSink, Presentation, RelayError};

use crate::payload::WebhookPayload;

/// Sink ID constant
const SINK_ID: &str = "SLACK_WEBHOOK";

/// Where and how notifications are posted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Incoming-webhook URL
    pub url: String,
    /// Channel override written into the payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            channel: None,
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

/// [`NotificationSink`] posting to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhookSink {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl SlackWebhookSink {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }
}

#[async_trait]
impl NotificationSink for SlackWebhookSink {
    fn id(&self) -> &'static str {
        SINK_ID
    }

    async fn deliver(
        &self,
        message: &ComposedMessage,
        presentation: &Presentation,
    ) -> Result<(), RelayError> {
        let payload = WebhookPayload::new(message, presentation, self.config.channel.as_deref());
        debug!("Posting {} notification to webhook", presentation.label);

        let response = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Problem with webhook request: {}", e);
                RelayError::delivery_transport(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!("Webhook rejected notification ({}): {}", status, body);
        Err(rejection(status, body))
    }
}

fn rejection(status: StatusCode, body: String) -> RelayError {
    RelayError::delivery_status(status.as_u16(), body.trim())
}
