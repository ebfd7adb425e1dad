use serde::{Deserialize, Serialize};

/// A single key/value tag attached to an instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTag {
    pub key: String,
    pub value: String,
}

impl InstanceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Live details about a compute instance, as reported by the inventory.
///
/// Everything but the identifier is optional: the inventory may omit any attribute
/// (a terminated instance has no private address, for example), and an empty
/// answer yields [`InstanceFacts::empty`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceFacts {
    pub instance_id: String,
    pub launch_time: Option<String>,
    pub state: Option<String>,
    pub private_dns_name: Option<String>,
    pub private_ip_address: Option<String>,
    pub instance_type: Option<String>,
    pub availability_zone: Option<String>,
    /// Tags in the order the inventory returned them
    #[serde(default)]
    pub tags: Vec<InstanceTag>,
}

impl InstanceFacts {
    /// Facts for an instance the inventory returned nothing about.
    pub fn empty(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            ..Default::default()
        }
    }
}
