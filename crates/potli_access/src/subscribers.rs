//! Invite emails and access flag propagation.

use crate::gate::ACCESS_FLAG;
use potli_common::services::{Notification, SharedNotificationProvider};
use potli_common::{DomainEvent, EventBus};
use potli_config::AppConfig;
use potli_db::{
    DbClient, DbError, Repository, SqlInviteRepository, SqlUserRepository, UserRepository,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub const INVITE_TEMPLATE: &str = "user-invite";

#[derive(Clone)]
pub struct AccessSubscribers {
    config: Arc<AppConfig>,
    users: SqlUserRepository,
    invites: SqlInviteRepository,
    notifications: Option<SharedNotificationProvider>,
}

impl AccessSubscribers {
    pub fn new(
        config: Arc<AppConfig>,
        db: DbClient,
        notifications: Option<SharedNotificationProvider>,
    ) -> Self {
        Self {
            config,
            users: SqlUserRepository::new(db.clone()),
            invites: SqlInviteRepository::new(db),
            notifications,
        }
    }

    pub async fn handle(&self, event: DomainEvent) {
        let result = match &event {
            DomainEvent::InviteCreated { id } => self.on_invite_created(id).await,
            DomainEvent::InviteAccepted { id } => self.on_invite_accepted(id).await,
            _ => Ok(()),
        };
        if let Err(e) = result {
            error!("Failed to handle {}: {}", event.name(), e);
        }
    }

    pub fn invite_url(&self, token: &str) -> String {
        let query = serde_urlencoded::to_string([("token", token)]).unwrap_or_default();
        format!("{}/app/invite?{}", self.config.urls.backend_base(), query)
    }

    pub async fn on_invite_created(&self, id: &str) -> Result<(), DbError> {
        let Some(invite) = self.invites.read(id).await? else {
            debug!("Invite {} is gone, not sending", id);
            return Ok(());
        };
        let Some(provider) = self.notifications.as_ref() else {
            warn!("No notification provider configured, invite {} not emailed", id);
            return Ok(());
        };

        let notification = Notification::email(
            &invite.email,
            INVITE_TEMPLATE,
            json!({ "invite_url": self.invite_url(&invite.token), "email": invite.email }),
        );
        match provider.send(notification).await {
            Ok(_) => info!("Invite email sent to {}", invite.email),
            Err(e) => error!("Failed to send invite email to {}: {}", invite.email, e),
        }
        Ok(())
    }

    /// Carries a pre-granted access flag from the invite over to the new user.
    pub async fn on_invite_accepted(&self, id: &str) -> Result<(), DbError> {
        let Some(invite) = self.invites.read(id).await? else {
            return Ok(());
        };
        if invite.metadata.get(ACCESS_FLAG) != Some(&Value::Bool(true)) {
            return Ok(());
        }
        let Some(mut user) = self.users.find_by_email(&invite.email).await? else {
            return Ok(());
        };
        if user.metadata.get(ACCESS_FLAG) == Some(&Value::Bool(true)) {
            return Ok(());
        }

        user.metadata.insert(ACCESS_FLAG.to_string(), Value::Bool(true));
        user.updated_at = chrono::Utc::now();
        let user = self.users.update(user).await?;
        info!("Granted {} to {} from invite {}", ACCESS_FLAG, user.id, id);
        Ok(())
    }
}

pub fn spawn_subscribers(bus: &EventBus, subscribers: AccessSubscribers) -> JoinHandle<()> {
    let subscribers = Arc::new(subscribers);
    bus.spawn_subscriber("access", move |event| {
        let subscribers = subscribers.clone();
        async move { subscribers.handle(event).await }
    })
}
