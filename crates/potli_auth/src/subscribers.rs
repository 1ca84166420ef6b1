//! Event subscribers for registration and password reset emails.

use crate::jwt::CUSTOMER_ACTOR;
use crate::token::generate_verification_token;
use crate::verification::EmailVerificationService;
use chrono::Utc;
use potli_common::services::{Notification, SharedNotificationProvider};
use potli_common::{DomainEvent, EventBus};
use potli_config::AppConfig;
use potli_db::{DbError, Repository, SqlCustomerRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub const PASSWORD_RESET_TEMPLATE: &str = "password-reset";
pub const DEFAULT_STOREFRONT_URL: &str = "http://localhost:3000";

#[derive(Clone)]
pub struct AuthSubscribers {
    pub config: Arc<AppConfig>,
    pub customers: SqlCustomerRepository,
    pub notifications: Option<SharedNotificationProvider>,
    pub verification: EmailVerificationService,
    /// Mail a verification link on `customer.created`.
    pub send_verification: bool,
}

impl AuthSubscribers {
    pub fn new(
        config: Arc<AppConfig>,
        customers: SqlCustomerRepository,
        notifications: Option<SharedNotificationProvider>,
    ) -> Self {
        let verification =
            EmailVerificationService::new(notifications.clone(), config.urls.backend_base());
        Self {
            config,
            customers,
            notifications,
            verification,
            send_verification: true,
        }
    }

    pub async fn handle(&self, event: DomainEvent) {
        match event {
            DomainEvent::CustomerCreated { id } if self.send_verification => {
                if let Err(e) = self.on_customer_created(&id).await {
                    error!("Failed to handle customer creation for {}: {}", id, e);
                }
            }
            DomainEvent::PasswordReset {
                entity_id,
                token,
                actor_type,
            } => self.on_password_reset(&entity_id, &token, &actor_type).await,
            _ => {}
        }
    }

    /// Stores a fresh verification token and mails it. Delivery failures are logged only.
    pub async fn on_customer_created(&self, id: &str) -> Result<(), DbError> {
        let Some(mut customer) = self.customers.read(id).await? else {
            warn!("Customer {} not found after creation", id);
            return Ok(());
        };

        if customer.metadata.get("email_verified") == Some(&Value::Bool(true)) {
            info!("Customer {} already verified, skipping verification email", customer.email);
            return Ok(());
        }

        let token = generate_verification_token(&self.config.http.jwt_secret, &customer.id, &customer.email);
        let now = Utc::now();
        customer.metadata.insert("email_verified".into(), Value::Bool(false));
        customer.metadata.insert("verification_token".into(), Value::String(token.clone()));
        customer.metadata.insert(
            "verification_token_created_at".into(),
            Value::String(now.timestamp_millis().to_string()),
        );
        customer.updated_at = now;
        let customer = self.customers.update(customer).await?;

        if let Err(e) = self
            .verification
            .send_verification_email(&customer.email, &token, customer.first_name.as_deref())
            .await
        {
            error!("Failed to send verification email to {}: {}", customer.email, e);
        }
        Ok(())
    }

    pub fn reset_url(&self, email: &str, token: &str, actor_type: &str) -> String {
        let prefix = if actor_type == CUSTOMER_ACTOR {
            self.config
                .urls
                .frontend_url_or(DEFAULT_STOREFRONT_URL)
                .trim_end_matches('/')
                .to_string()
        } else {
            format!("{}/app", self.config.urls.backend_base())
        };
        let query = serde_urlencoded::to_string([("token", token), ("email", email)]).unwrap_or_default();
        format!("{prefix}/reset-password?{query}")
    }

    pub async fn on_password_reset(&self, email: &str, token: &str, actor_type: &str) {
        let Some(provider) = self.notifications.as_ref() else {
            warn!("No notification provider configured, dropping password reset for {}", email);
            return;
        };

        let reset_url = self.reset_url(email, token, actor_type);
        let notification = Notification::email(
            email,
            PASSWORD_RESET_TEMPLATE,
            json!({ "reset_url": reset_url, "email": email }),
        );
        match provider.send(notification).await {
            Ok(_) => info!("Password reset email sent to {}", email),
            Err(e) => error!("Failed to send password reset email to {}: {}", email, e),
        }
    }
}

/// Runs the auth subscribers on their own task.
pub fn spawn_subscribers(bus: &EventBus, subscribers: AuthSubscribers) -> JoinHandle<()> {
    let subscribers = Arc::new(subscribers);
    bus.spawn_subscriber("auth", move |event| {
        let subscribers = subscribers.clone();
        async move { subscribers.handle(event).await }
    })
}
