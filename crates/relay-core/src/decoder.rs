//! Event decoder.
//!
//! Turns a raw invocation payload into [`NotificationEvent`]s. The payload is walked
//! record by record so that one bad record never poisons the rest of the batch:
//!
//! - records without an `Sns` envelope are not ours and produce nothing;
//! - an envelope whose `Message` cannot be decoded yields [`RelayError::MalformedPayload`];
//! - a message without an instance identifier yields [`RelayError::MissingInstanceId`].
//!
//! # Instance identifier fallback
//!
//! The identifier is looked up in a fixed order, and the first non-empty value wins:
//!
//! 1. `detail.EC2InstanceId` (autoscaling lifecycle events)
//! 2. `detail.instance-id` (EC2 state-change events)

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{RelayError, Result};
use crate::models::NotificationEvent;

/// Field holding the list of records in an invocation payload.
const RECORDS_FIELD: &str = "Records";

/// Field holding the pub/sub envelope inside a record.
const ENVELOPE_FIELD: &str = "Sns";

/// SNS envelope of a record. Only the fields the relay needs.
#[derive(Debug, Deserialize)]
struct SnsEnvelope {
    #[serde(rename = "TopicArn")]
    topic_arn: String,
    #[serde(rename = "Message")]
    message: String,
}

/// EventBridge event carried in the SNS message body.
#[derive(Debug, Deserialize)]
struct LifecycleMessage {
    #[serde(default)]
    source: Option<String>,
    #[serde(rename = "detail-type", default)]
    detail_type: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    detail: Option<LifecycleDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct LifecycleDetail {
    #[serde(rename = "EC2InstanceId", default)]
    ec2_instance_id: Option<String>,
    #[serde(rename = "instance-id", default)]
    instance_id: Option<String>,
    #[serde(rename = "AutoScalingGroupName", default)]
    autoscaling_group_name: Option<String>,
    #[serde(rename = "Cause", default)]
    cause: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
}

impl LifecycleDetail {
    /// Applies the ordered identifier fallback.
    fn instance_id(&self) -> Option<&str> {
        [&self.ec2_instance_id, &self.instance_id]
            .into_iter()
            .find_map(|candidate| non_empty(candidate.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Decode every qualifying record of `batch`.
///
/// The returned iterator is lazy: each record is decoded when it is pulled, once.
/// Records without an envelope are filtered out, so the iterator only yields
/// records that were meant for the relay.
pub fn decode(batch: &Value) -> impl Iterator<Item = Result<NotificationEvent>> + '_ {
    batch
        .get(RECORDS_FIELD)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .enumerate()
        .filter_map(|(index, record)| {
            let Some(envelope) = record.get(ENVELOPE_FIELD) else {
                debug!("Record {} has no {} envelope, ignoring", index, ENVELOPE_FIELD);
                return None;
            };
            Some(decode_envelope(envelope))
        })
}

/// Decode a single `Sns` envelope.
pub fn decode_envelope(envelope: &Value) -> Result<NotificationEvent> {
    let envelope = SnsEnvelope::deserialize(envelope)
        .map_err(|e| RelayError::malformed(format!("invalid SNS envelope: {}", e)))?;
    decode_message(&envelope.message, &envelope.topic_arn)
}

/// Decode the body of an SNS message published on `origin_topic`.
pub fn decode_message(message: &str, origin_topic: &str) -> Result<NotificationEvent> {
    let message: LifecycleMessage = serde_json::from_str(message)
        .map_err(|e| RelayError::malformed(format!("invalid message body: {}", e)))?;
    let detail = message.detail.unwrap_or_default();

    let instance_id = detail
        .instance_id()
        .ok_or(RelayError::MissingInstanceId)?
        .to_string();

    // Cause and description only mean something alongside a group name.
    let (autoscaling_group_name, cause, description) =
        match non_empty(detail.autoscaling_group_name.as_deref()) {
            Some(group) => (Some(group.to_string()), detail.cause, detail.description),
            None => (None, None, None),
        };

    Ok(NotificationEvent {
        source_service: message.source.unwrap_or_default(),
        event_type: message.detail_type.unwrap_or_default(),
        region: message.region.unwrap_or_default(),
        instance_id,
        autoscaling_group_name,
        cause,
        description,
        origin_topic: origin_topic.to_string(),
    })
}
