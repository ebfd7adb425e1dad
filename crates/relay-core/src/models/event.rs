use serde::{Deserialize, Serialize};

/// A decoded lifecycle notification.
///
/// Built once per qualifying record by the decoder and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Emitting service (`source`, e.g. "aws.autoscaling")
    pub source_service: String,

    /// Event kind (`detail-type`, e.g. "EC2 Instance Terminate Successful")
    pub event_type: String,

    /// Region the event was emitted in
    pub region: String,

    /// Instance the event refers to. Never empty.
    pub instance_id: String,

    /// Autoscaling group, present only for autoscaling events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling_group_name: Option<String>,

    /// Autoscaling cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,

    /// Autoscaling activity description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Topic the record was published on, used for routing
    pub origin_topic: String,
}

impl NotificationEvent {
    /// Whether the event came from an autoscaling group.
    pub fn is_autoscaling(&self) -> bool {
        self.autoscaling_group_name.is_some()
    }
}
