//! Relay models
//!
//! This module contains the data types that flow through one record's chain:
//! - `event` - Decoded lifecycle notification (NotificationEvent)
//! - `instance` - Enrichment result from the instance inventory (InstanceFacts, InstanceTag)
//! - `message` - Display-ready text body (ComposedMessage)
//! - `presentation` - Routing-derived chat presentation (Presentation, Environment)

mod event;
mod instance;
mod message;
mod presentation;

pub use event::NotificationEvent;
pub use instance::{InstanceFacts, InstanceTag};
pub use message::ComposedMessage;
pub use presentation::{Environment, Presentation};
