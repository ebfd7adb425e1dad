//! Message composer.
//!
//! Renders instance facts, and the autoscaling context when there is one, into the
//! plain-text body posted to the chat channel. Line order is fixed; absent values
//! render as an empty suffix so the layout never shifts between events.

use crate::models::{ComposedMessage, InstanceFacts, NotificationEvent};

/// Header opening the autoscaling section.
pub const AUTOSCALING_HEADER: &str = "<< AutoScalingGroup Event >>";

/// Header preceding the tag lines.
pub const TAGS_HEADER: &str = "Tags:";

/// Indentation of a tag line under [`TAGS_HEADER`].
const TAG_INDENT: &str = "  ";

/// Compose the notification body for `event`, enriched with `facts`.
pub fn compose(facts: &InstanceFacts, event: &NotificationEvent) -> ComposedMessage {
    let mut lines = render_facts(facts);

    if let Some(group) = event.autoscaling_group_name.as_deref() {
        // Blank separator line before the section.
        lines.push(String::new());
        lines.push(AUTOSCALING_HEADER.to_string());
        lines.push(field("Service", Some(event.source_service.as_str())));
        lines.push(field("Event", Some(event.event_type.as_str())));
        lines.push(field("Region", Some(event.region.as_str())));
        lines.push(field("Description", event.description.as_deref()));
        lines.push(field("AutoScalingGroup", Some(group)));
        lines.push(field("Cause", event.cause.as_deref()));
    }

    ComposedMessage::new(lines.join("\n"))
}

fn render_facts(facts: &InstanceFacts) -> Vec<String> {
    let mut lines = vec![
        field("InstanceId", Some(facts.instance_id.as_str())),
        field("LaunchTime", facts.launch_time.as_deref()),
        field("State", facts.state.as_deref()),
        field("PrivateDnsName", facts.private_dns_name.as_deref()),
        field("PrivateIpAddress", facts.private_ip_address.as_deref()),
        field("InstanceType", facts.instance_type.as_deref()),
        field("AvailabilityZone", facts.availability_zone.as_deref()),
        TAGS_HEADER.to_string(),
    ];
    lines.extend(
        facts
            .tags
            .iter()
            .map(|tag| format!("{}{}: {}", TAG_INDENT, tag.key, tag.value)),
    );
    lines
}

fn field(label: &str, value: Option<&str>) -> String {
    format!("{}: {}", label, value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstanceTag;

    fn facts() -> InstanceFacts {
        InstanceFacts {
            instance_id: "i-123".to_string(),
            launch_time: Some("2024-05-01T12:00:00Z".to_string()),
            state: Some("running".to_string()),
            private_dns_name: Some("ip-10-0-0-5.ec2.internal".to_string()),
            private_ip_address: Some("10.0.0.5".to_string()),
            instance_type: Some("m5.large".to_string()),
            availability_zone: Some("us-east-1a".to_string()),
            tags: vec![
                InstanceTag::new("Name", "k8s-minion"),
                InstanceTag::new("KubernetesCluster", "dev"),
            ],
        }
    }

    fn event() -> NotificationEvent {
        NotificationEvent {
            source_service: "aws.autoscaling".to_string(),
            event_type: "EC2 Instance Terminate Successful".to_string(),
            region: "us-east-1".to_string(),
            instance_id: "i-123".to_string(),
            autoscaling_group_name: None,
            cause: None,
            description: None,
            origin_topic: "arn:aws:sns:us-east-1:123456789012:dev".to_string(),
        }
    }

    #[test]
    fn test_base_rendering() {
        let message = compose(&facts(), &event());
        assert_eq!(
            message.as_str(),
            "InstanceId: i-123\n\
             LaunchTime: 2024-05-01T12:00:00Z\n\
             State: running\n\
             PrivateDnsName: ip-10-0-0-5.ec2.internal\n\
             PrivateIpAddress: 10.0.0.5\n\
             InstanceType: m5.large\n\
             AvailabilityZone: us-east-1a\n\
             Tags:\n  \
             Name: k8s-minion\n  \
             KubernetesCluster: dev"
        );
    }

    #[test]
    fn test_tags_header_without_tags() {
        let message = compose(&InstanceFacts::empty("i-123"), &event());
        assert_eq!(
            message.as_str(),
            "InstanceId: i-123\n\
             LaunchTime: \n\
             State: \n\
             PrivateDnsName: \n\
             PrivateIpAddress: \n\
             InstanceType: \n\
             AvailabilityZone: \n\
             Tags:"
        );
    }

    #[test]
    fn test_autoscaling_block() {
        let mut event = event();
        event.autoscaling_group_name = Some("asg-1".to_string());
        event.cause = Some("scale-in".to_string());

        let message = compose(&facts(), &event);
        let text = message.as_str();

        assert!(text.contains("KubernetesCluster: dev\n\n<< AutoScalingGroup Event >>\n"));
        assert!(text.ends_with(
            "Service: aws.autoscaling\n\
             Event: EC2 Instance Terminate Successful\n\
             Region: us-east-1\n\
             Description: \n\
             AutoScalingGroup: asg-1\n\
             Cause: scale-in"
        ));
    }

    #[test]
    fn test_no_autoscaling_block_without_group() {
        let mut event = event();
        event.cause = Some("ignored".to_string());

        let text = compose(&facts(), &event).into_inner();
        assert!(!text.contains(AUTOSCALING_HEADER));
        assert!(!text.contains("Cause:"));
        assert!(!text.ends_with('\n'));
    }
}
