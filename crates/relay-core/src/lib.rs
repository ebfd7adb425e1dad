//! Lifecycle Relay Core
//!
//! Domain logic for relaying instance lifecycle notifications to a chat channel.
//!
//! # Overview
//!
//! Each record of an invocation goes through the same chain:
//!
//! ```text
//! +------------------+     +------------------+
//! |     Decoder      | --> | NotificationEvent|
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | InstanceInventory|  (EC2, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Composer     |  (ComposedMessage)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |      Router      |  (Presentation)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | NotificationSink |  (Slack webhook, ...)
//!                          +------------------+
//! ```
//!
//! The [`Relay`] orchestrates the chain and folds record outcomes into a
//! [`BatchReport`]. Inventory and sink implementations live in their own crates.

pub mod composer;
pub mod decoder;
pub mod errors;
pub mod inventory;
pub mod models;
pub mod relay;
pub mod router;
pub mod sink;

pub use composer::compose;
pub use decoder::decode;
pub use errors::{RelayError, Result};
pub use inventory::InstanceInventory;
pub use models::{
    ComposedMessage, Environment, InstanceFacts, InstanceTag, NotificationEvent, Presentation,
};
pub use relay::{BatchReport, RecordOutcome, RecordStage, Relay};
pub use router::{Router, RoutingConfig, DEFAULT_DEV_ICON_URL, DEFAULT_PROD_ICON_URL};
pub use sink::NotificationSink;
