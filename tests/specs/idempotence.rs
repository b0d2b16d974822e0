//! Repeated passes without drift.

use crate::prelude::*;
use tfsync_core::{DestinationType, Notification};

#[tokio::test]
async fn second_pass_makes_no_remote_mutations() {
    let h = Harness::new();
    h.platform.add_member("acme", "ops@acme.test", "user-9");
    let key = h.declare(
        h.workspace()
            .variable("region", "eu-west-1")
            .env_variable("TF_LOG", "warn")
            .output("vpc", "vpc_id")
            .ssh_key("sshkey-1")
            .agent_pool("apool-1")
            .notification(Notification {
                name: "ops".to_string(),
                destination_type: DestinationType::Email,
                enabled: true,
                triggers: vec!["run:errored".to_string()],
                recipients: vec!["ops@acme.test".to_string()],
                ..Default::default()
            })
            .build(),
    );
    h.converge(&key).await;
    h.platform.clear_calls();
    let writes = h.maps.writes();
    let version = h.resource(&key).meta.resource_version;

    h.reconcile(&key).await;
    h.reconcile(&key).await;

    assert!(h.platform.mutations().is_empty(), "{:?}", h.platform.mutations());
    assert_eq!(h.maps.writes(), writes);
    assert_eq!(h.resource(&key).meta.resource_version, version);
}

#[tokio::test]
async fn missing_resource_needs_no_work() {
    let h = Harness::new();
    let key = tfsync_core::ResourceKey::new("default", "absent");

    assert_eq!(h.reconcile(&key).await, tfsync_engine::Requeue::Done);
    assert!(h.platform.calls().is_empty());
}
