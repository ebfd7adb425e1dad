//! Notification sink abstraction.

use async_trait::async_trait;

use crate::errors::RelayError;
use crate::models::{ComposedMessage, Presentation};

/// Destination for composed notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Identifier used in logs, e.g. "SLACK_WEBHOOK".
    fn id(&self) -> &'static str;

    /// Make exactly one delivery attempt.
    ///
    /// Anything other than an accepted delivery maps to [`RelayError::Delivery`].
    /// Implementations must not retry.
    async fn deliver(
        &self,
        message: &ComposedMessage,
        presentation: &Presentation,
    ) -> Result<(), RelayError>;
}
