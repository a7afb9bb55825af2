//! Notification feed integration tests.

use chrono::{Duration, Utc};
use serde_json::json;

use salesdesk_core::error::ErrorKind;
use salesdesk_core::types::id::{NotificationId, UserId};
use salesdesk_entity::notification::{NotificationDocument, NotificationDraft};
use salesdesk_realtime::{FeedFilter, FeedQuery};
use salesdesk_store::traits::NotificationStore;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_unread_count_matches_snapshot_through_updates() {
    let app = TestApp::new();
    let user = UserId::new();
    let ids = app.seed_unread(user, 4).await;
    let feed = app.feed_for(user).await;

    assert_eq!(feed.unread_count(), 4);

    feed.mark_read(ids[1]).await.unwrap();
    let snap = feed.wait_until(|s| s.unread_count == 3).await;
    assert_eq!(
        snap.unread_count,
        snap.notifications.iter().filter(|n| !n.read).count()
    );

    feed.mark_unread(ids[1]).await.unwrap();
    let snap = feed.wait_until(|s| s.unread_count == 4).await;
    assert_eq!(snap.unread_ids().len(), 4);

    feed.unsubscribe();
}

#[tokio::test]
async fn test_mark_read_twice_is_idempotent() {
    let app = TestApp::new();
    let user = UserId::new();
    let ids = app.seed_unread(user, 2).await;
    let feed = app.feed_for(user).await;

    feed.mark_read(ids[0]).await.unwrap();
    feed.wait_until(|s| s.unread_count == 1).await;
    feed.mark_read(ids[0]).await.unwrap();

    assert_eq!(app.store.read_flag(ids[0]), Some(Some(true)));
    assert_eq!(feed.unread_count(), 1);
}

#[tokio::test]
async fn test_newer_notification_moves_to_top() {
    let app = TestApp::new();
    let user = UserId::new();
    app.seed_unread(user, 3).await;
    let feed = app.feed_for(user).await;

    let fresh = app
        .store
        .insert(NotificationDraft::new(user, "alert", "Deal moved to negotiation"))
        .await
        .unwrap();

    let snap = feed.wait_until(|s| s.notifications.len() == 4).await;
    assert_eq!(snap.notifications[0].id, fresh);
    assert_eq!(snap.unread_count, 4);
    assert!(
        snap.notifications
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp)
    );
}

#[tokio::test]
async fn test_other_users_notifications_never_appear() {
    let app = TestApp::new();
    let alice = UserId::new();
    let bob = UserId::new();
    app.seed_unread(alice, 2).await;
    let feed = app.feed_for(alice).await;

    app.seed_unread(bob, 3).await;
    app.store
        .insert(NotificationDraft::new(alice, "lead", "Only for Alice"))
        .await
        .unwrap();

    let snap = feed.wait_until(|s| s.notifications.len() == 3).await;
    assert!(snap.notifications.iter().all(|n| n.user_id == alice));
}

#[tokio::test]
async fn test_mark_all_read_persists_every_write() {
    let app = TestApp::new();
    let user = UserId::new();
    app.seed_unread(user, 5).await;
    let feed = app.feed_for(user).await;

    let report = feed.mark_all_read().await;
    assert_eq!(report.attempted, 5);
    assert!(report.is_complete());

    let stored = app.store.find_by_user(user).await.unwrap();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|d| d.read == Some(true)));

    let snap = feed.wait_until(|s| s.unread_count == 0).await;
    assert_eq!(snap.notifications.len(), 5);
}

#[tokio::test]
async fn test_mark_all_read_tolerates_one_failed_write() {
    let app = TestApp::new();
    let user = UserId::new();
    let ids = app.seed_unread(user, 5).await;
    app.store.faults().fail_notification_write(ids[2]);
    let feed = app.feed_for(user).await;

    let report = feed.mark_all_read().await;
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, ids[2]);

    let snap = feed.wait_until(|s| s.unread_count == 1).await;
    assert_eq!(snap.unread_ids(), vec![ids[2]]);
}

#[tokio::test]
async fn test_optimistic_failure_is_reconciled() {
    let mut app = TestApp::new();
    app.config.feed.optimistic_updates = true;
    let user = UserId::new();
    let ids = app.seed_unread(user, 2).await;
    app.store.faults().fail_notification_write(ids[0]);
    let feed = app.feed_for(user).await;

    assert!(feed.mark_read(ids[0]).await.is_err());
    let snap = feed.wait_until(|s| s.unread_count == 2).await;
    assert!(snap.get(ids[0]).is_some_and(|n| !n.read));
}

#[tokio::test]
async fn test_optimistic_mark_all_read_restores_failed_entry() {
    let mut app = TestApp::new();
    app.config.feed.optimistic_updates = true;
    let user = UserId::new();
    let ids = app.seed_unread(user, 5).await;
    app.store.faults().fail_notification_write(ids[3]);
    let feed = app.feed_for(user).await;

    let report = feed.mark_all_read().await;
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, ids[3]);

    // Reconcile already ran before mark_all_read returned.
    let snap = feed.snapshot();
    assert_eq!(snap.unread_count, 1);
    assert_eq!(snap.unread_ids(), vec![ids[3]]);
    assert_eq!(app.store.read_flag(ids[3]), Some(Some(false)));
}

#[tokio::test]
async fn test_viewed_alias_and_missing_fields_are_normalised() {
    let app = TestApp::new();
    let user = UserId::new();
    let seen: NotificationDocument = serde_json::from_value(json!({
        "id": NotificationId::new().to_string(),
        "userId": user.to_string(),
        "message": "Project Apollo kicked off",
        "type": "project_assignment",
        "viewed": true,
        "timestamp": (Utc::now() - Duration::hours(1)).to_rfc3339(),
    }))
    .unwrap();
    let bare: NotificationDocument = serde_json::from_value(json!({
        "id": NotificationId::new().to_string(),
        "userId": user.to_string(),
        "message": "Legacy alert",
        "type": "alert",
    }))
    .unwrap();
    app.store.put_notification(seen.clone());
    app.store.put_notification(bare.clone());

    let feed = app.feed_for(user).await;
    let snap = feed.snapshot();
    assert_eq!(snap.notifications.len(), 2);
    assert_eq!(snap.unread_count, 1);
    assert!(snap.get(seen.id).is_some_and(|n| n.read));
    assert!(snap.get(bare.id).is_some_and(|n| !n.read));
}

#[tokio::test]
async fn test_revoked_access_degrades_to_empty_feed() {
    let app = TestApp::new();
    let user = UserId::new();
    app.seed_unread(user, 3).await;
    let feed = app.feed_for(user).await;
    assert_eq!(feed.unread_count(), 3);

    assert!(feed.subscription_error().is_none());

    app.store.revoke_access(user);
    let snap = feed.wait_until(|s| s.is_empty()).await;
    assert_eq!(snap.unread_count, 0);

    // The live query ends after the error.
    tokio::time::timeout(std::time::Duration::from_secs(1), async {
        while feed.is_live() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    let err = feed.subscription_error().unwrap();
    assert_eq!(err.kind, ErrorKind::Subscription);
}

#[tokio::test]
async fn test_archive_and_filters_over_live_feed() {
    let app = TestApp::new();
    let user = UserId::new();
    let ids = app.seed_unread(user, 4).await;
    let feed = app.feed_for(user).await;

    feed.mark_read(ids[3]).await.unwrap();
    feed.wait_until(|s| s.unread_count == 3).await;
    feed.archive(ids[0]);

    let all = feed.view(&FeedQuery::default());
    assert_eq!(all.total_items, 3);
    let read = feed.view(&FeedQuery::default().filter(FeedFilter::Read));
    assert_eq!(read.items.len(), 1);
    assert_eq!(read.items[0].id, ids[3]);
    let archived = feed.view(&FeedQuery::default().filter(FeedFilter::Archived));
    assert_eq!(archived.items[0].id, ids[0]);

    // Archiving does not touch the unread count.
    assert_eq!(feed.unread_count(), 3);
    feed.unarchive(ids[0]);
    assert!(!feed.is_archived(ids[0]));
}
