//! Verification email delivery.

use crate::error::AuthError;
use potli_common::services::{Notification, NotificationContent, SharedNotificationProvider};
use serde_json::json;
use tracing::{error, info};

pub const VERIFICATION_SUBJECT: &str = "Verify your email address";
pub const VERIFICATION_TEMPLATE: &str = "email-verification";

#[derive(Clone)]
pub struct EmailVerificationService {
    notifications: Option<SharedNotificationProvider>,
    backend_url: String,
}

impl EmailVerificationService {
    pub fn new(notifications: Option<SharedNotificationProvider>, backend_url: impl Into<String>) -> Self {
        Self {
            notifications,
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{backend}/auth/verify-email?token=...`
    pub fn verification_url(&self, token: &str) -> String {
        let query = serde_urlencoded::to_string([("token", token)]).unwrap_or_default();
        format!("{}/auth/verify-email?{}", self.backend_url, query)
    }

    pub async fn send_verification_email(
        &self,
        email: &str,
        token: &str,
        first_name: Option<&str>,
    ) -> Result<(), AuthError> {
        let Some(provider) = self.notifications.as_ref() else {
            error!("No notification provider configured, cannot verify {}", email);
            return Err(AuthError::Notification("Failed to send verification email".to_string()));
        };

        let url = self.verification_url(token);
        let greeting = match first_name.filter(|name| !name.is_empty()) {
            Some(name) => format!("Hi {name},"),
            None => "Hi there,".to_string(),
        };

        let mut notification = Notification::email(
            email,
            VERIFICATION_TEMPLATE,
            json!({ "verification_url": url, "email": email }),
        );
        notification.content = Some(NotificationContent {
            subject: VERIFICATION_SUBJECT.to_string(),
            html: render_html(&greeting, &url),
            text: Some(render_text(&greeting, &url)),
        });

        provider.send(notification).await.map_err(|e| {
            error!("Failed to send verification email to {}: {}", email, e);
            AuthError::Notification("Failed to send verification email".to_string())
        })?;

        info!("Verification email sent to {}", email);
        Ok(())
    }
}

fn render_text(greeting: &str, url: &str) -> String {
    format!(
        "{greeting}\n\n\
         Please verify your account by clicking the link below:\n\n\
         {url}\n\n\
         This link will expire in 24 hours.\n\n\
         If you didn't create an account, you can safely ignore this email.\n"
    )
}

fn render_html(greeting: &str, url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Verify your email</title>
  </head>
  <body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background-color: #ffffff; border-radius: 8px; padding: 40px; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
      <h1 style="color: #1a1a1a; margin-top: 0;">Verify your email address</h1>
      <p style="font-size: 16px; color: #666;">{greeting}</p>
      <p style="font-size: 16px; color: #666;">Please verify your account by clicking the button below:</p>
      <div style="text-align: center; margin: 30px 0;">
        <a href="{url}" style="display: inline-block; background-color: #ff9933; color: #ffffff; padding: 12px 30px; text-decoration: none; border-radius: 6px; font-weight: 600; font-size: 16px;">Verify Email Address</a>
      </div>
      <p style="font-size: 14px; color: #999; margin-top: 30px;">If the button doesn't work, copy and paste this link into your browser:</p>
      <p style="font-size: 12px; color: #999; word-break: break-all;">{url}</p>
      <p style="font-size: 14px; color: #999; margin-top: 30px;">This link will expire in 24 hours.</p>
      <p style="font-size: 14px; color: #999; margin-top: 20px;">If you didn't create an account, you can safely ignore this email.</p>
    </div>
  </body>
</html>"#
    )
}
