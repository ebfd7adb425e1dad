//! Slack incoming-webhook wire format.

use serde::Serialize;

use lifecycle_relay_core::{ComposedMessage, Presentation};

/// Body posted to the webhook: a single attachment, optionally aimed at a channel.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<&'a str>,
    pub attachments: Vec<Attachment<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Attachment<'a> {
    pub color: &'a str,
    pub title: &'a str,
    pub text: &'a str,
    pub thumb_url: &'a str,
}

impl<'a> WebhookPayload<'a> {
    pub fn new(
        message: &'a ComposedMessage,
        presentation: &'a Presentation,
        channel: Option<&'a str>,
    ) -> Self {
        Self {
            channel,
            attachments: vec![Attachment {
                color: &presentation.color,
                title: &presentation.label,
                text: message.as_str(),
                thumb_url: &presentation.icon_url,
            }],
        }
    }
}
