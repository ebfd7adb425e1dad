//! Handler orchestrator.
//!
//! Drives each record through its chain and folds the per-record outcomes into the
//! invocation outcome.
//!
//! ```text
//! Decoded -> Enriching -> Composing -> Delivering -> Delivered
//!               |                          |
//!               +--------> Failed <--------+
//! ```
//!
//! Records run one after another; a failed record never stops the ones after it,
//! but any failure fails the invocation.

use std::fmt;
use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::Value;

use crate::composer::compose;
use crate::decoder::decode;
use crate::errors::{RelayError, Result};
use crate::inventory::InstanceInventory;
use crate::models::{Environment, NotificationEvent};
use crate::router::Router;
use crate::sink::NotificationSink;

/// Non-terminal stages of a record's chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordStage {
    Decoded,
    Enriching,
    Composing,
    Delivering,
}

impl fmt::Display for RecordStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordStage::Decoded => "decoded",
            RecordStage::Enriching => "enriching",
            RecordStage::Composing => "composing",
            RecordStage::Delivering => "delivering",
        };
        f.write_str(name)
    }
}

/// Terminal state of one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The notification was accepted by the sink.
    Delivered {
        instance_id: String,
        environment: Environment,
    },
    /// The record could not be decoded and was left alone.
    Skipped { error: RelayError },
    /// A stage of the chain failed.
    Failed {
        instance_id: String,
        stage: RecordStage,
        error: RelayError,
    },
}

impl RecordOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, RecordOutcome::Failed { .. })
    }
}

/// Ordered outcomes of every qualifying record in a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn delivered(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Delivered { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(RecordOutcome::is_failed)
    }

    fn count(&self, predicate: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| predicate(o)).count()
    }

    /// Error of the first failed record, in batch order.
    pub fn first_failure(&self) -> Option<&RelayError> {
        self.outcomes.iter().find_map(|outcome| match outcome {
            RecordOutcome::Failed { error, .. } => Some(error),
            _ => None,
        })
    }

    /// Status message reported on success.
    pub fn summary(&self) -> String {
        let mut summary = format!("Delivered {} notification(s)", self.delivered());
        let skipped = self.skipped();
        if skipped > 0 {
            summary.push_str(&format!(", skipped {} undecodable record(s)", skipped));
        }
        summary
    }

    /// Invocation outcome: the first failure if any record failed, the summary otherwise.
    pub fn into_result(self) -> Result<String> {
        match self.first_failure() {
            Some(error) => Err(error.clone()),
            None => Ok(self.summary()),
        }
    }
}

/// Relays lifecycle events from the inventory to the sink.
pub struct Relay {
    inventory: Arc<dyn InstanceInventory>,
    sink: Arc<dyn NotificationSink>,
    router: Router,
}

impl Relay {
    pub fn new(
        inventory: Arc<dyn InstanceInventory>,
        sink: Arc<dyn NotificationSink>,
        router: Router,
    ) -> Self {
        Self {
            inventory,
            sink,
            router,
        }
    }

    /// Process every record of an invocation payload, in order.
    pub async fn handle_batch(&self, batch: &Value) -> BatchReport {
        let mut report = BatchReport::default();

        for decoded in decode(batch) {
            let outcome = match decoded {
                Ok(event) => self.process_event(&event).await,
                Err(error) => {
                    warn!("Skipping record: {}", error);
                    RecordOutcome::Skipped { error }
                }
            };
            report.outcomes.push(outcome);
        }

        info!(
            "Batch complete: {} delivered, {} skipped, {} failed",
            report.delivered(),
            report.skipped(),
            report.failed()
        );
        report
    }

    /// Run one decoded event to a terminal state.
    pub async fn process_event(&self, event: &NotificationEvent) -> RecordOutcome {
        let instance_id = event.instance_id.clone();
        debug!(
            "Record {} {} (topic {})",
            instance_id,
            RecordStage::Decoded,
            event.origin_topic
        );

        debug!("Record {} {} via {}", instance_id, RecordStage::Enriching, self.inventory.id());
        let facts = match self.inventory.fetch(&event.instance_id).await {
            Ok(facts) => facts,
            Err(error) => return Self::failed(instance_id, RecordStage::Enriching, error),
        };

        debug!("Record {} {}", instance_id, RecordStage::Composing);
        let message = compose(&facts, event);
        let presentation = self.router.presentation(&event.origin_topic);

        debug!("Record {} {} via {}", instance_id, RecordStage::Delivering, self.sink.id());
        if let Err(error) = self.sink.deliver(&message, &presentation).await {
            return Self::failed(instance_id, RecordStage::Delivering, error);
        }

        info!(
            "Delivered notification for {} ({})",
            instance_id, presentation.environment
        );
        RecordOutcome::Delivered {
            instance_id,
            environment: presentation.environment,
        }
    }

    fn failed(instance_id: String, stage: RecordStage, error: RelayError) -> RecordOutcome {
        error!("Record {} failed while {}: {}", instance_id, stage, error);
        RecordOutcome::Failed {
            instance_id,
            stage,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComposedMessage, InstanceFacts, Presentation};
    use crate::router::RoutingConfig;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    const DEV_TOPIC: &str = "arn:aws:sns:us-east-1:123456789012:dev-events";
    const PROD_TOPIC: &str = "arn:aws:sns:us-east-1:123456789012:prod-events";

    /// Mock inventory failing for ids listed in `failing`.
    #[derive(Default)]
    struct MockInventory {
        failing: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl InstanceInventory for MockInventory {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn fetch(&self, instance_id: &str) -> std::result::Result<InstanceFacts, RelayError> {
            self.calls.lock().unwrap().push(instance_id.to_string());
            if self.failing.iter().any(|id| id == instance_id) {
                return Err(RelayError::enrichment(instance_id, "connection refused"));
            }
            let mut facts = InstanceFacts::empty(instance_id);
            facts.state = Some("running".to_string());
            Ok(facts)
        }
    }

    /// Mock sink answering with `status` (200 means accepted).
    struct MockSink {
        status: u16,
        delivered: Mutex<Vec<(ComposedMessage, Presentation)>>,
    }

    impl MockSink {
        fn with_status(status: u16) -> Self {
            Self {
                status,
                delivered: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NotificationSink for MockSink {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn deliver(
            &self,
            message: &ComposedMessage,
            presentation: &Presentation,
        ) -> std::result::Result<(), RelayError> {
            self.delivered
                .lock()
                .unwrap()
                .push((message.clone(), presentation.clone()));
            if self.status == 200 {
                Ok(())
            } else {
                Err(RelayError::delivery_status(self.status, ""))
            }
        }
    }

    fn relay(inventory: Arc<MockInventory>, sink: Arc<MockSink>) -> Relay {
        Relay::new(inventory, sink, Router::new(RoutingConfig::new(DEV_TOPIC)))
    }

    fn record(topic: &str, detail: Value) -> Value {
        json!({
            "Sns": {
                "TopicArn": topic,
                "Message": json!({
                    "source": "aws.ec2",
                    "detail-type": "EC2 Instance State-change Notification",
                    "region": "us-east-1",
                    "detail": detail,
                }).to_string(),
            }
        })
    }

    #[tokio::test]
    async fn test_delivers_each_record_once() {
        let inventory = Arc::new(MockInventory::default());
        let sink = Arc::new(MockSink::with_status(200));
        let relay = relay(inventory.clone(), sink.clone());

        let batch = json!({ "Records": [
            record(DEV_TOPIC, json!({ "instance-id": "i-1" })),
            record(PROD_TOPIC, json!({ "instance-id": "i-2" })),
        ]});
        let report = relay.handle_batch(&batch).await;

        assert_eq!(report.delivered(), 2);
        assert_eq!(*inventory.calls.lock().unwrap(), vec!["i-1", "i-2"]);

        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].1.environment, Environment::Development);
        assert_eq!(delivered[1].1.environment, Environment::Production);
        assert!(delivered[0].0.as_str().starts_with("InstanceId: i-1\n"));

        assert_eq!(
            report.into_result(),
            Ok("Delivered 2 notification(s)".to_string())
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_records() {
        let inventory = Arc::new(MockInventory {
            failing: vec!["i-1".to_string()],
            ..Default::default()
        });
        let sink = Arc::new(MockSink::with_status(200));
        let relay = relay(inventory.clone(), sink.clone());

        let batch = json!({ "Records": [
            record(DEV_TOPIC, json!({ "instance-id": "i-1" })),
            record(DEV_TOPIC, json!({ "instance-id": "i-2" })),
        ]});
        let report = relay.handle_batch(&batch).await;

        assert_eq!(report.failed(), 1);
        assert_eq!(report.delivered(), 1);
        assert_eq!(sink.delivered.lock().unwrap().len(), 1);
        assert!(matches!(
            &report.outcomes[0],
            RecordOutcome::Failed { stage: RecordStage::Enriching, .. }
        ));
        assert_eq!(
            report.into_result(),
            Err(RelayError::enrichment("i-1", "connection refused"))
        );
    }

    #[tokio::test]
    async fn test_non_200_delivery_fails_without_retry() {
        let inventory = Arc::new(MockInventory::default());
        let sink = Arc::new(MockSink::with_status(500));
        let relay = relay(inventory, sink.clone());

        let batch = json!({ "Records": [record(DEV_TOPIC, json!({ "instance-id": "i-1" }))] });
        let report = relay.handle_batch(&batch).await;

        assert_eq!(sink.delivered.lock().unwrap().len(), 1);
        assert!(matches!(
            &report.outcomes[0],
            RecordOutcome::Failed { stage: RecordStage::Delivering, .. }
        ));
        assert_eq!(
            report.into_result(),
            Err(RelayError::delivery_status(500, ""))
        );
    }

    #[tokio::test]
    async fn test_first_failure_is_reported() {
        let inventory = Arc::new(MockInventory {
            failing: vec!["i-2".to_string(), "i-3".to_string()],
            ..Default::default()
        });
        let sink = Arc::new(MockSink::with_status(200));
        let relay = relay(inventory, sink);

        let batch = json!({ "Records": [
            record(DEV_TOPIC, json!({ "instance-id": "i-1" })),
            record(DEV_TOPIC, json!({ "instance-id": "i-2" })),
            record(DEV_TOPIC, json!({ "instance-id": "i-3" })),
        ]});
        let report = relay.handle_batch(&batch).await;

        assert_eq!(report.failed(), 2);
        assert_eq!(
            report.first_failure(),
            Some(&RelayError::enrichment("i-2", "connection refused"))
        );
    }

    #[tokio::test]
    async fn test_skipped_records_keep_batch_successful() {
        let inventory = Arc::new(MockInventory::default());
        let sink = Arc::new(MockSink::with_status(200));
        let relay = relay(inventory.clone(), sink);

        let batch = json!({ "Records": [
            record(DEV_TOPIC, json!({ "state": "pending" })),
            { "Sns": { "TopicArn": DEV_TOPIC, "Message": "{" } },
            { "kinesis": {} },
            record(DEV_TOPIC, json!({ "instance-id": "i-9" })),
        ]});
        let report = relay.handle_batch(&batch).await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.skipped(), 2);
        assert_eq!(*inventory.calls.lock().unwrap(), vec!["i-9"]);
        assert_eq!(
            report.into_result(),
            Ok("Delivered 1 notification(s), skipped 2 undecodable record(s)".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_batch_succeeds() {
        let relay = relay(
            Arc::new(MockInventory::default()),
            Arc::new(MockSink::with_status(200)),
        );
        let report = relay.handle_batch(&json!({ "Records": [] })).await;
        assert!(report.outcomes.is_empty());
        assert_eq!(
            report.into_result(),
            Ok("Delivered 0 notification(s)".to_string())
        );
    }
}
