// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::{DestinationType, Notification, NotificationConfig, Reason, UserId};

fn email_notification(recipients: &[&str]) -> Notification {
    Notification {
        name: "ops".to_string(),
        destination_type: DestinationType::Email,
        enabled: true,
        triggers: vec!["run:errored".to_string(), "run:completed".to_string()],
        recipients: recipients.iter().map(|r| r.to_string()).collect(),
        ..Default::default()
    }
}

fn slack_notification() -> Notification {
    Notification {
        name: "chat".to_string(),
        destination_type: DestinationType::Slack,
        enabled: true,
        url: "https://hooks.slack.test/T000".to_string(),
        triggers: vec!["run:completed".to_string()],
        ..Default::default()
    }
}

fn notification_calls(ctx: &TestContext) -> usize {
    count(&ctx.platform.mutations(), |c| {
        matches!(
            c,
            PlatformCall::CreateNotification { .. } | PlatformCall::DeleteNotification { .. }
        )
    })
}

#[tokio::test]
async fn creates_notifications_with_resolved_recipients() {
    let ctx = setup();
    ctx.platform.add_member("acme", "Dana@Acme.test", "user-1");
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .notification(email_notification(&["dana@acme.test"]))
            .notification(slack_notification())
            .build(),
    );

    pass(&ctx, &key).await;

    let remote = ctx.platform.notifications(&remote_of(&ctx, &key).id);
    assert_eq!(remote.len(), 2);
    let ops = remote.iter().find(|n| n.config.name == "ops").unwrap();
    assert_eq!(ops.config.email_addresses, vec!["dana@acme.test".to_string()]);
    assert_eq!(ops.config.email_user_ids, vec![UserId::new("user-1")]);
}

#[tokio::test]
async fn unknown_recipient_is_skipped_with_warning() {
    let ctx = setup();
    ctx.platform.add_member("acme", "dana@acme.test", "user-1");
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .notification(email_notification(&["dana@acme.test", "eve@elsewhere.test"]))
            .build(),
    );

    pass(&ctx, &key).await;

    let remote = ctx.platform.notifications(&remote_of(&ctx, &key).id);
    assert_eq!(remote[0].config.email_addresses, vec!["dana@acme.test".to_string()]);
    let skipped = ctx
        .recorder
        .events()
        .into_iter()
        .find(|e| e.reason == Reason::NotificationSkipped)
        .unwrap();
    assert!(skipped.message.contains("eve@elsewhere.test"), "{}", skipped.message);
}

#[tokio::test]
async fn matching_notifications_are_left_alone() {
    let ctx = setup();
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .notification(slack_notification())
            .build(),
    );
    pass(&ctx, &key).await;
    ctx.platform.clear_calls();

    pass(&ctx, &key).await;

    assert_eq!(notification_calls(&ctx), 0);
}

#[tokio::test]
async fn trigger_order_does_not_count_as_a_change() {
    let ctx = setup();
    ctx.platform.add_member("acme", "dana@acme.test", "user-1");
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .notification(email_notification(&["dana@acme.test"]))
            .build(),
    );
    pass(&ctx, &key).await;

    let mut reordered = email_notification(&["dana@acme.test"]);
    reordered.triggers.reverse();
    ctx.apply(WorkspaceBuilder::new().no_source().notification(reordered).build());
    ctx.platform.clear_calls();
    pass(&ctx, &key).await;

    assert_eq!(notification_calls(&ctx), 0);
}

#[tokio::test]
async fn changed_notification_is_replaced() {
    let ctx = setup();
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .notification(slack_notification())
            .build(),
    );
    pass(&ctx, &key).await;

    let mut changed = slack_notification();
    changed.enabled = false;
    ctx.apply(WorkspaceBuilder::new().no_source().notification(changed).build());
    pass(&ctx, &key).await;

    let remote = ctx.platform.notifications(&remote_of(&ctx, &key).id);
    assert_eq!(remote.len(), 1);
    assert!(!remote[0].config.enabled);
}

#[tokio::test]
async fn undeclared_and_duplicate_notifications_are_deleted() {
    let ctx = setup();
    let id = ctx.platform.add_workspace("acme", "default-app");
    let chat = NotificationConfig::from_desired(&slack_notification(), Vec::new());
    ctx.platform.add_notification(&id, chat.clone());
    ctx.platform.add_notification(&id, chat);
    ctx.platform.add_notification(
        &id,
        NotificationConfig {
            name: "legacy".to_string(),
            ..Default::default()
        },
    );
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .notification(slack_notification())
            .build(),
    );

    pass(&ctx, &key).await;

    let remote = ctx.platform.notifications(&id);
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].config.name, "chat");
    assert_eq!(notification_calls(&ctx), 2);
}

#[tokio::test]
async fn no_members_lookup_without_recipients() {
    let ctx = setup();
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .notification(slack_notification())
            .build(),
    );

    pass(&ctx, &key).await;

    assert_eq!(
        count(&ctx.platform.calls(), |c| matches!(
            c,
            PlatformCall::ListOrganizationMembers { .. }
        )),
        0
    );
}
