//! Variable convergence.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn stale_variables_are_replaced_and_secrets_refreshed() {
    let h = Harness::new();
    let id = h.platform.add_workspace("acme", "default-app");
    h.platform.add_variable(&id, "B", "old", true);
    h.platform.add_variable(&id, "C", "stale", false);
    h.set_secret("B", "fresh");
    let key = h.declare(
        h.workspace()
            .no_source()
            .variable("A", "1")
            .secret_variable("B")
            .build(),
    );

    h.reconcile(&key).await;

    let mut vars = h.platform.variables(&id);
    vars.sort();
    assert_eq!(
        vars,
        vec![
            ("A".to_string(), "1".to_string(), false),
            ("B".to_string(), "fresh".to_string(), true),
        ]
    );
}

#[tokio::test]
async fn remote_keys_match_declared_keys_after_one_pass() {
    let h = Harness::new();
    let id = h.platform.add_workspace("acme", "default-app");
    for key in ["x", "y", "z"] {
        h.platform.add_variable(&id, key, "remote", false);
    }
    let key = h.declare(
        h.workspace()
            .no_source()
            .variable("y", "declared")
            .env_variable("w", "env")
            .build(),
    );

    h.reconcile(&key).await;

    let mut vars = h.platform.variables(&id);
    vars.sort();
    assert_eq!(
        vars,
        vec![
            ("w".to_string(), "env".to_string(), false),
            ("y".to_string(), "declared".to_string(), false),
        ]
    );
}

#[tokio::test]
async fn sensitive_variables_are_resubmitted_every_pass() {
    let h = Harness::new();
    h.set_secret("token", "s3cret");
    let key = h.declare(h.workspace().no_source().secret_variable("token").build());
    h.reconcile(&key).await;
    h.platform.clear_calls();

    h.reconcile(&key).await;

    let updates = h
        .platform
        .mutations()
        .into_iter()
        .filter(|c| matches!(c, PlatformCall::UpdateVariable { .. }))
        .count();
    assert_eq!(updates, 1);
}
