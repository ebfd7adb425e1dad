//! Presentation routing.
//!
//! The routing rule is binary: the configured development topic maps to the
//! Development presentation, and every other topic (unknown, empty, misspelled)
//! maps to Production.

use serde::{Deserialize, Serialize};

use crate::models::{Environment, Presentation};

/// Thumbnail used for development notifications unless overridden.
pub const DEFAULT_DEV_ICON_URL: &str =
    "https://cdn3.iconfinder.com/data/icons/macosxstyle/macosxstyle_png/512/Xcode.png";

/// Thumbnail used for production notifications unless overridden.
pub const DEFAULT_PROD_ICON_URL: &str =
    "http://dalistudios.com/wp-content/uploads/2013/06/DaliStudios-Social-Icons-Production.png";

/// Fixed routing configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Topic whose events are presented as Development
    pub dev_topic: String,
    pub dev_icon_url: String,
    pub prod_icon_url: String,
}

impl RoutingConfig {
    /// Routing config with the default icons.
    pub fn new(dev_topic: impl Into<String>) -> Self {
        Self {
            dev_topic: dev_topic.into(),
            dev_icon_url: DEFAULT_DEV_ICON_URL.to_string(),
            prod_icon_url: DEFAULT_PROD_ICON_URL.to_string(),
        }
    }
}

/// Selects the presentation of a notification from its origin topic.
#[derive(Clone, Debug)]
pub struct Router {
    config: RoutingConfig,
}

impl Router {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Environment the topic is attributed to.
    pub fn environment(&self, origin_topic: &str) -> Environment {
        if origin_topic == self.config.dev_topic {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    /// Presentation for a notification published on `origin_topic`.
    pub fn presentation(&self, origin_topic: &str) -> Presentation {
        match self.environment(origin_topic) {
            Environment::Development => {
                Presentation::new(Environment::Development, &self.config.dev_icon_url)
            }
            Environment::Production => {
                Presentation::new(Environment::Production, &self.config.prod_icon_url)
            }
        }
    }
}
