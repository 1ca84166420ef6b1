use crate::error::ResendError;
use crate::logic::{send_email, SendEmailRequest, DEFAULT_API_BASE};
use crate::templates::{render, SUPPORTED};
use potli_common::services::{
    BoxFuture, Notification, NotificationProvider, NotificationResult,
};
use potli_config::ResendConfig;
use tracing::{error, info};

/// Email delivery through Resend.
#[derive(Debug, Clone)]
pub struct ResendNotificationService {
    config: ResendConfig,
}

impl ResendNotificationService {
    pub const IDENTIFIER: &'static str = "notification-resend";

    /// Fails when `api_key` or `from` is empty.
    pub fn new(config: ResendConfig) -> Result<Self, ResendError> {
        if config.api_key.trim().is_empty() {
            return Err(ResendError::ConfigError("api_key is required".to_string()));
        }
        if config.from.trim().is_empty() {
            return Err(ResendError::ConfigError("from is required".to_string()));
        }
        Ok(Self { config })
    }

    fn api_base(&self) -> &str {
        self.config.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    async fn deliver(&self, request: SendEmailRequest) -> Result<NotificationResult, ResendError> {
        match send_email(self.api_base(), &self.config.api_key, &request).await {
            Ok(id) => {
                info!("Email '{}' sent to {:?}", request.subject, request.to);
                Ok(NotificationResult { id })
            }
            // The API rejected the message; nothing the caller can retry.
            Err(ResendError::ApiError { status_code, message }) => {
                error!("Resend send failed ({}): {}", status_code, message);
                Ok(NotificationResult::default())
            }
            Err(e) => {
                error!("Resend send error: {}", e);
                Err(e)
            }
        }
    }

    pub async fn send_notification(
        &self,
        notification: Notification,
    ) -> Result<NotificationResult, ResendError> {
        if notification.to.trim().is_empty() {
            return Err(ResendError::InvalidData(
                "No notification recipient (to) provided.".to_string(),
            ));
        }

        if let Some(content) = notification.content {
            return self
                .deliver(SendEmailRequest {
                    from: self.config.from.clone(),
                    to: vec![notification.to],
                    subject: content.subject,
                    html: content.html,
                    text: content.text,
                })
                .await;
        }

        let Some(email) = render(
            &notification.template,
            &notification.data,
            &self.config.html_templates,
        ) else {
            error!(
                "No email template for \"{}\". Supported: {}",
                notification.template,
                SUPPORTED.join(", ")
            );
            return Ok(NotificationResult::default());
        };

        self.deliver(SendEmailRequest {
            from: self.config.from.clone(),
            to: vec![notification.to],
            subject: email.subject,
            html: email.html,
            text: None,
        })
        .await
    }
}

impl NotificationProvider for ResendNotificationService {
    type Error = ResendError;

    fn send(&self, notification: Notification) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(self.send_notification(notification))
    }
}
