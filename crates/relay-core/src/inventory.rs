//! Instance inventory abstraction.

use async_trait::async_trait;

use crate::errors::RelayError;
use crate::models::InstanceFacts;

/// Source of live instance details.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use lifecycle_relay_core::{InstanceFacts, InstanceInventory, RelayError};
///
/// struct StaticInventory;
///
/// #[async_trait]
/// impl InstanceInventory for StaticInventory {
///     fn id(&self) -> &'static str {
///         "STATIC"
///     }
///
///     async fn fetch(&self, instance_id: &str) -> Result<InstanceFacts, RelayError> {
///         Ok(InstanceFacts::empty(instance_id))
///     }
/// }
/// ```
#[async_trait]
pub trait InstanceInventory: Send + Sync {
    /// Identifier used in logs, e.g. "EC2".
    fn id(&self) -> &'static str;

    /// Describe a single instance.
    ///
    /// Implementations issue exactly one query. An answer that names no instance is
    /// not an error and yields [`InstanceFacts::empty`]. Query failures map to
    /// [`RelayError::Enrichment`] and are never retried.
    async fn fetch(&self, instance_id: &str) -> Result<InstanceFacts, RelayError>;
}
