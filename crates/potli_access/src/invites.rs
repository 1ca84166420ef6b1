//! Admin users and invitations.

use crate::error::AccessError;
use crate::gate::ACCESS_FLAG;
use chrono::{Duration, Utc};
use potli_common::models::{AdminUser, Invite, Metadata};
use potli_common::{DomainEvent, EventBus};
use potli_db::{
    generate_id, DbClient, DbError, InviteRepository, Repository, SqlInviteRepository,
    SqlUserRepository, UserRepository,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

pub const INVITE_TTL_DAYS: i64 = 7;

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcceptInvite {
    pub token: Option<String>,
    /// Must match the invited address when given.
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Clone)]
pub struct InviteService {
    users: SqlUserRepository,
    invites: SqlInviteRepository,
    events: EventBus,
}

impl InviteService {
    pub fn new(db: DbClient, events: EventBus) -> Self {
        Self {
            users: SqlUserRepository::new(db.clone()),
            invites: SqlInviteRepository::new(db),
            events,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<AdminUser>, AccessError> {
        Ok(self.users.list().await?)
    }

    pub async fn list_invites(&self) -> Result<Vec<Invite>, AccessError> {
        Ok(self.invites.list().await?)
    }

    pub async fn create_invite(&self, email: &str, metadata: Metadata) -> Result<Invite, AccessError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AccessError::Validation("Email is required".to_string()));
        }

        let now = Utc::now();
        let invite = self
            .invites
            .create(Invite {
                id: generate_id("invite"),
                email: email.to_string(),
                token: uuid::Uuid::new_v4().simple().to_string(),
                accepted: false,
                expires_at: now + Duration::days(INVITE_TTL_DAYS),
                metadata,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!("Invite {} created for {}", invite.id, invite.email);
        self.events.emit(DomainEvent::InviteCreated {
            id: invite.id.clone(),
        });
        Ok(invite)
    }

    /// Turns a pending invite into an admin user. The user always gets the
    /// invited address and each invite is redeemed at most once.
    pub async fn accept(&self, input: AcceptInvite) -> Result<AdminUser, AccessError> {
        let token = input.token.filter(|t| !t.is_empty()).ok_or(AccessError::InvalidInvite)?;
        let invite = self
            .invites
            .find_by_token(&token)
            .await?
            .ok_or(AccessError::InvalidInvite)?;

        let now = Utc::now();
        if invite.accepted || invite.expires_at <= now {
            return Err(AccessError::InvalidInvite);
        }
        if let Some(email) = input.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            if !email.eq_ignore_ascii_case(&invite.email) {
                return Err(AccessError::Validation(
                    "Email does not match the invite".to_string(),
                ));
            }
        }

        if !self.invites.mark_accepted(&invite.id, now).await? {
            return Err(AccessError::InvalidInvite);
        }

        let created = self
            .users
            .create(AdminUser {
                id: generate_id("user"),
                email: invite.email.clone(),
                first_name: input.first_name,
                last_name: input.last_name,
                metadata: Metadata::new(),
                created_at: now,
                updated_at: now,
            })
            .await;
        let user = match created {
            Ok(user) => user,
            Err(e) => {
                // Hand the invite back so it can be retried.
                self.invites.update(invite).await?;
                return Err(match e {
                    DbError::Duplicate(_) => AccessError::DuplicateUser,
                    other => other.into(),
                });
            }
        };

        info!("Invite {} accepted by {}", invite.id, user.id);
        self.events.emit(DomainEvent::InviteAccepted { id: invite.id });
        Ok(user)
    }

    pub async fn set_access_flag(&self, user_id: &str, allowed: bool) -> Result<AdminUser, AccessError> {
        let mut user = self.users.read(user_id).await?.ok_or(AccessError::UserNotFound)?;
        user.metadata.insert(ACCESS_FLAG.to_string(), Value::Bool(allowed));
        user.updated_at = Utc::now();
        Ok(self.users.update(user).await?)
    }
}
