//! Slack webhook delivery for the lifecycle relay.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lifecycle_relay_slack::{SlackWebhookSink, WebhookConfig};
//!
//! let sink = SlackWebhookSink::new(
//!     WebhookConfig::new("https://hooks.slack.com/services/...").with_channel("ops"),
//! );
//! sink.deliver(&message, &presentation).await?;
//! ```

mod client;
mod payload;

pub use client::{SlackWebhookSink, WebhookConfig};
pub use payload::{Attachment, WebhookPayload};
