//! EC2 instance inventory for the lifecycle relay.
//!
//! Describes a single instance with `DescribeInstances` and maps the answer into
//! [`InstanceFacts`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use lifecycle_relay_ec2::Ec2Inventory;
//!
//! let inventory = Ec2Inventory::from_env().await;
//! let facts = inventory.fetch("i-0123456789abcdef0").await?;
//! ```

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;
use aws_sdk_ec2::primitives::DateTimeFormat;
use aws_sdk_ec2::types::Instance;
use aws_sdk_ec2::Client;
use log::{debug, error};

use lifecycle_relay_core::{InstanceFacts, InstanceInventory, InstanceTag, RelayError};

/// Inventory ID constant
const INVENTORY_ID: &str = "EC2";

/// EC2-backed [`InstanceInventory`].
#[derive(Debug, Clone)]
pub struct Ec2Inventory {
    client: Client,
}

impl Ec2Inventory {
    /// Wrap an existing EC2 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration (environment, profile,
    /// or the Lambda execution role).
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl InstanceInventory for Ec2Inventory {
    fn id(&self) -> &'static str {
        INVENTORY_ID
    }

    async fn fetch(&self, instance_id: &str) -> Result<InstanceFacts, RelayError> {
        debug!("Describing instance {}", instance_id);

        let output = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| enrichment_error(instance_id, &e))?;

        Ok(facts_from_output(instance_id, &output))
    }
}

/// Map a query failure, keeping the whole source chain in the diagnostic.
fn enrichment_error<E>(instance_id: &str, err: &E) -> RelayError
where
    E: std::error::Error,
{
    let message = DisplayErrorContext(err).to_string();
    error!("DescribeInstances failed for {}: {}", instance_id, message);
    RelayError::enrichment(instance_id, message)
}

/// Facts for the first instance in the answer, or empty facts if there is none.
fn facts_from_output(instance_id: &str, output: &DescribeInstancesOutput) -> InstanceFacts {
    let instance = output
        .reservations()
        .iter()
        .flat_map(|reservation| reservation.instances())
        .next();

    match instance {
        Some(instance) => facts_from_instance(instance_id, instance),
        None => {
            debug!("No reservation matches {}", instance_id);
            InstanceFacts::empty(instance_id)
        }
    }
}

fn facts_from_instance(instance_id: &str, instance: &Instance) -> InstanceFacts {
    InstanceFacts {
        instance_id: instance.instance_id().unwrap_or(instance_id).to_string(),
        launch_time: instance
            .launch_time()
            .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok()),
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|name| name.as_str().to_string()),
        private_dns_name: instance.private_dns_name().map(str::to_string),
        private_ip_address: instance.private_ip_address().map(str::to_string),
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
        availability_zone: instance
            .placement()
            .and_then(|p| p.availability_zone())
            .map(str::to_string),
        tags: instance
            .tags()
            .iter()
            .map(|tag| {
                InstanceTag::new(
                    tag.key().unwrap_or_default(),
                    tag.value().unwrap_or_default(),
                )
            })
            .collect(),
    }
}
