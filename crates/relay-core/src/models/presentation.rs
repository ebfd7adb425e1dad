use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment an event is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Title shown on the chat attachment.
    pub fn label(&self) -> &'static str {
        match self {
            Environment::Development => "Development",
            Environment::Production => "Production",
        }
    }

    /// Attachment color tag understood by the chat service.
    pub fn color(&self) -> &'static str {
        match self {
            Environment::Development => "good",
            Environment::Production => "danger",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a notification is presented in the chat channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub environment: Environment,
    pub label: String,
    pub color: String,
    pub icon_url: String,
}

impl Presentation {
    pub fn new(environment: Environment, icon_url: impl Into<String>) -> Self {
        Self {
            environment,
            label: environment.label().to_string(),
            color: environment.color().to_string(),
            icon_url: icon_url.into(),
        }
    }
}
