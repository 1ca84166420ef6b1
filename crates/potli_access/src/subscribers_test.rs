use crate::handlers_test::{harness, insert_user};
use crate::invites::{AcceptInvite, InviteService};
use crate::subscribers::{spawn_subscribers, AccessSubscribers};
use potli_common::models::Metadata;
use potli_common::services::{
    BoxFuture, BoxedError, Notification, NotificationProvider, NotificationResult,
    SharedNotificationProvider,
};
use potli_db::{Repository, SqlUserRepository};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<Notification>>,
}

impl NotificationProvider for Outbox {
    type Error = BoxedError;

    fn send(&self, notification: Notification) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(notification);
            Ok(NotificationResult { id: Some("msg_1".into()) })
        })
    }
}

fn flagged() -> Metadata {
    serde_json::from_value(json!({"can_access_users_developer": true})).unwrap()
}

#[tokio::test]
async fn test_invite_created_sends_link() {
    let h = harness().await;
    let outbox = Arc::new(Outbox::default());
    let subs = AccessSubscribers::new(h.config.clone(), h.db.clone(), Some(outbox.clone() as SharedNotificationProvider));
    let invite = InviteService::new(h.db.clone(), h.events.clone())
        .create_invite("new@shop.com", Metadata::new())
        .await
        .unwrap();

    subs.on_invite_created(&invite.id).await.unwrap();
    subs.on_invite_created("invite_missing").await.unwrap();

    let sent = outbox.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "new@shop.com");
    assert_eq!(sent[0].template, "user-invite");
    assert_eq!(
        sent[0].data["invite_url"],
        format!("http://localhost:9000/app/invite?token={}", invite.token)
    );
    assert_eq!(sent[0].data["email"], "new@shop.com");
}

#[tokio::test]
async fn test_invite_accepted_copies_access_flag() {
    let h = harness().await;
    let invites = InviteService::new(h.db.clone(), h.events.clone());
    let subs = AccessSubscribers::new(h.config.clone(), h.db.clone(), None);

    let invite = invites.create_invite("dev@shop.com", flagged()).await.unwrap();
    let user = invites
        .accept(AcceptInvite { token: Some(invite.token.clone()), ..Default::default() })
        .await
        .unwrap();
    assert!(user.metadata.get("can_access_users_developer").is_none());

    subs.on_invite_accepted(&invite.id).await.unwrap();
    let stored = SqlUserRepository::new(h.db.clone()).read(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.metadata["can_access_users_developer"], true);

    // Plain invites leave the user alone.
    let plain = invites.create_invite("plain@shop.com", Metadata::new()).await.unwrap();
    let plain_user = insert_user(&h.db, "plain@shop.com", json!({})).await;
    subs.on_invite_accepted(&plain.id).await.unwrap();
    let stored = SqlUserRepository::new(h.db.clone()).read(&plain_user.id).await.unwrap().unwrap();
    assert!(stored.metadata.get("can_access_users_developer").is_none());
}

#[tokio::test]
async fn test_spawned_subscriber_emails_new_invites() {
    let h = harness().await;
    let outbox = Arc::new(Outbox::default());
    let handle = spawn_subscribers(
        &h.events,
        AccessSubscribers::new(h.config.clone(), h.db.clone(), Some(outbox.clone() as SharedNotificationProvider)),
    );

    InviteService::new(h.db.clone(), h.events.clone())
        .create_invite("bus@shop.com", Metadata::new())
        .await
        .unwrap();
    drop(h.app);
    drop(h.events);
    handle.await.unwrap();

    assert_eq!(outbox.sent.lock().unwrap().len(), 1);
}
