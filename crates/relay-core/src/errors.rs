//! Error types for the relay.
//!
//! Every error is scoped to a single record. [`RelayError::is_record_skip`] separates
//! decode-stage problems (the record is skipped) from failures that fail the record and,
//! through it, the whole invocation.

use thiserror::Error;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur while relaying a lifecycle event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The record carried an envelope, but its contents could not be decoded.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Neither `detail.EC2InstanceId` nor `detail.instance-id` carried a value.
    #[error("Missing instance id: neither detail.EC2InstanceId nor detail.instance-id is set")]
    MissingInstanceId,

    /// The instance inventory query failed.
    /// Not retried.
    #[error("Enrichment failed for {instance_id}: {message}")]
    Enrichment {
        /// The instance that was being described
        instance_id: String,
        /// Diagnostic from the inventory service or its transport
        message: String,
    },

    /// The webhook did not accept the notification.
    ///
    /// `status` is `None` when the request never produced a response.
    #[error("Delivery failed: {}", delivery_detail(.status, .message))]
    Delivery {
        /// HTTP status returned by the webhook, if any
        status: Option<u16>,
        /// Response body or transport diagnostic
        message: String,
    },

    /// Required configuration was missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn delivery_detail(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) if message.is_empty() => format!("status code: {}", code),
        Some(code) => format!("status code: {} ({})", code, message),
        None => message.to_string(),
    }
}

impl RelayError {
    /// Create a malformed payload error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    /// Create an enrichment error for the given instance.
    pub fn enrichment(instance_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Enrichment {
            instance_id: instance_id.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error from a non-success HTTP status.
    pub fn delivery_status(status: u16, message: impl Into<String>) -> Self {
        Self::Delivery {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a delivery error from a transport failure.
    pub fn delivery_transport(message: impl Into<String>) -> Self {
        Self::Delivery {
            status: None,
            message: message.into(),
        }
    }

    /// Returns true for decode-stage errors.
    ///
    /// These skip the offending record without failing the batch.
    pub fn is_record_skip(&self) -> bool {
        matches!(self, Self::MalformedPayload(_) | Self::MissingInstanceId)
    }
}
