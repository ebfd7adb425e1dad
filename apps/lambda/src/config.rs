use anyhow::Result;
use lifecycle_relay_core::{RelayError, RoutingConfig, DEFAULT_DEV_ICON_URL, DEFAULT_PROD_ICON_URL};
use lifecycle_relay_slack::WebhookConfig;

pub const WEBHOOK_URL_VAR: &str = "RELAY_WEBHOOK_URL";
pub const DEV_TOPIC_VAR: &str = "RELAY_DEV_TOPIC_ARN";
pub const SLACK_CHANNEL_VAR: &str = "RELAY_SLACK_CHANNEL";
pub const DEV_ICON_VAR: &str = "RELAY_DEV_ICON_URL";
pub const PROD_ICON_VAR: &str = "RELAY_PROD_ICON_URL";
pub const LOG_FORMAT_VAR: &str = "RELAY_LOG_FORMAT";

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, for CloudWatch.
    Json,
    Text,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("text") {
            LogFormat::Text
        } else {
            LogFormat::Json
        }
    }
}

/// Relay configuration, fixed for the lifetime of the function instance.
#[derive(Clone, Debug)]
pub struct Config {
    pub routing: RoutingConfig,
    pub webhook: WebhookConfig,
    pub log_format: LogFormat,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let required = |key: &str| {
            get(key).ok_or_else(|| RelayError::Config(format!("{} must be set", key)))
        };
        let url = required(WEBHOOK_URL_VAR)?;
        let dev_topic = required(DEV_TOPIC_VAR)?;

        let routing = RoutingConfig {
            dev_topic,
            dev_icon_url: get(DEV_ICON_VAR).unwrap_or_else(|| DEFAULT_DEV_ICON_URL.to_string()),
            prod_icon_url: get(PROD_ICON_VAR)
                .unwrap_or_else(|| DEFAULT_PROD_ICON_URL.to_string()),
        };

        let mut webhook = WebhookConfig::new(url);
        if let Some(channel) = get(SLACK_CHANNEL_VAR) {
            webhook = webhook.with_channel(channel);
        }

        let log_format = get(LOG_FORMAT_VAR)
            .map(|value| LogFormat::parse(&value))
            .unwrap_or(LogFormat::Json);

        Ok(Self {
            routing,
            webhook,
            log_format,
        })
    }
}
