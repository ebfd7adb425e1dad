use std::sync::Arc;

use lifecycle_relay_core::{Relay, RelayError, Router};
use lifecycle_relay_ec2::Ec2Inventory;
use lifecycle_relay_slack::SlackWebhookSink;
use serde_json::{json, Value};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .without_time(),
            )
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_ansi(false).with_target(true).without_time())
            .init(),
    }
}

/// Wire the EC2 inventory and the Slack sink into a relay.
pub async fn build_relay(config: &Config) -> Relay {
    let inventory = Arc::new(Ec2Inventory::from_env().await);
    let sink = Arc::new(SlackWebhookSink::new(config.webhook.clone()));
    tracing::info!(
        dev_topic = %config.routing.dev_topic,
        channel = ?config.webhook.channel,
        "Relay configured"
    );
    Relay::new(inventory, sink, Router::new(config.routing.clone()))
}

/// Run one invocation payload through the relay.
///
/// Succeeds with `{"status": ...}` only if no record failed; otherwise returns the
/// first failure.
pub async fn handle_invocation(
    relay: &Relay,
    payload: &Value,
    request_id: &str,
) -> Result<Value, RelayError> {
    let span = tracing::info_span!("invocation", request_id = %request_id);
    let _guard = span.enter();

    let records = payload
        .get("Records")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    tracing::info!(records, "Processing invocation");

    match relay.handle_batch(payload).await.into_result() {
        Ok(status) => {
            tracing::info!(%status, "Invocation succeeded");
            Ok(json!({ "status": status }))
        }
        Err(error) => {
            tracing::error!(%error, "Invocation failed");
            Err(error)
        }
    }
}
