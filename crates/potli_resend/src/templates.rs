//! Built-in email templates.
//!
//! Configured `html_templates` win over the built-ins; their content may use
//! `{{key}}` placeholders filled from the notification data.

use potli_config::HtmlTemplate;
use serde_json::Value;
use std::collections::HashMap;

pub const PASSWORD_RESET: &str = "password-reset";
pub const USER_INVITE: &str = "user-invite";

pub const SUPPORTED: [&str; 2] = [PASSWORD_RESET, USER_INVITE];

const BODY_STYLE: &str = "font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, \
    'Helvetica Neue', Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; \
    margin: 0 auto; padding: 20px;";
const CARD_STYLE: &str = "background-color: #ffffff; border-radius: 8px; padding: 40px; \
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);";
const BUTTON_STYLE: &str = "display: inline-block; background-color: #ff9933; color: #ffffff; \
    padding: 12px 30px; text-decoration: none; border-radius: 6px; font-weight: 600; \
    font-size: 16px;";

/// Subject and html ready to hand to the API.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

fn data_str<'a>(data: &'a Value, key: &str) -> &'a str {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("")
}

fn greeting(email: &str) -> String {
    if email.is_empty() {
        "Hello,".to_string()
    } else {
        format!("Hello {},", email)
    }
}

struct Layout<'a> {
    title: &'a str,
    email: &'a str,
    intro: &'a str,
    link: &'a str,
    button: &'a str,
    footer: &'a [&'a str],
}

fn layout(parts: Layout<'_>) -> String {
    let footer: String = parts
        .footer
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let margin = if i == 0 { " margin-top: 30px;" } else { "" };
            format!("      <p style=\"font-size: 14px; color: #999;{margin}\">\n        {line}\n      </p>\n")
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
  </head>
  <body style="{BODY_STYLE}">
    <div style="{CARD_STYLE}">
      <h1 style="color: #1a1a1a; margin-top: 0;">{title}</h1>
      <p style="font-size: 16px; color: #666;">
        {greeting}
      </p>
      <p style="font-size: 16px; color: #666;">
        {intro}
      </p>
      <div style="text-align: center; margin: 30px 0;">
        <a href="{link}"
           style="{BUTTON_STYLE}">
          {button}
        </a>
      </div>
      <p style="font-size: 14px; color: #999;">
        Or copy and paste this URL into your browser:
      </p>
      <p style="font-size: 12px; color: #999; word-break: break-all;">{link}</p>
{footer}    </div>
  </body>
</html>"#,
        title = parts.title,
        greeting = greeting(parts.email),
        intro = parts.intro,
        link = parts.link,
        button = parts.button,
        footer = footer,
    )
}

pub fn password_reset_html(data: &Value) -> String {
    let reset_url = match data_str(data, "reset_url") {
        "" => "#",
        url => url,
    };
    layout(Layout {
        title: "Reset Your Password",
        email: data_str(data, "email"),
        intro: "We received a request to reset your password. Click the button below to create a new password for your account.",
        link: reset_url,
        button: "Reset Password",
        footer: &[
            "This link will expire in 15 minutes for security reasons.",
            "If you didn't request a password reset, you can safely ignore this email.",
        ],
    })
}

pub fn user_invite_html(data: &Value) -> String {
    let invite_url = match data_str(data, "invite_url") {
        "" => "#",
        url => url,
    };
    layout(Layout {
        title: "You're invited",
        email: data_str(data, "email"),
        intro: "You have been invited to join as an admin user. Click the button below to accept the invite and set up your account.",
        link: invite_url,
        button: "Accept Invite",
        footer: &["This invite link will expire. If you didn't expect this email, you can safely ignore it."],
    })
}

/// Replaces `{{key}}` with the matching top level string or number in `data`.
/// Unknown placeholders are left untouched.
pub fn substitute(content: &str, data: &Value) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match data.get(key) {
            Some(Value::String(s)) => out.push_str(s),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => out.push_str(&v.to_string()),
            _ => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn default_subject(template: &str) -> &'static str {
    match template {
        PASSWORD_RESET => "Reset Your Password",
        USER_INVITE => "You're invited to join",
        _ => "Notification",
    }
}

/// Returns `None` when neither configuration nor the built-ins know `template`.
pub fn render(
    template: &str,
    data: &Value,
    overrides: &HashMap<String, HtmlTemplate>,
) -> Option<RenderedEmail> {
    let configured = overrides.get(template);

    let html = match configured.filter(|t| !t.content.is_empty()) {
        Some(t) => substitute(&t.content, data),
        None => match template {
            PASSWORD_RESET => password_reset_html(data),
            USER_INVITE => user_invite_html(data),
            _ => return None,
        },
    };

    let subject = configured
        .and_then(|t| t.subject.as_deref())
        .filter(|s| !s.is_empty())
        .map(|s| substitute(s, data))
        .unwrap_or_else(|| default_subject(template).to_string());

    Some(RenderedEmail { subject, html })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_reset_builtin() {
        let email = render(
            PASSWORD_RESET,
            &json!({"reset_url": "https://shop.test/reset?token=abc", "email": "a@b.com"}),
            &HashMap::new(),
        )
        .expect("built-in template");

        assert_eq!(email.subject, "Reset Your Password");
        assert!(email.html.starts_with("<!DOCTYPE html>"));
        assert!(email.html.contains("Hello a@b.com,"));
        assert!(email.html.contains("href=\"https://shop.test/reset?token=abc\""));
        assert!(email.html.contains("expire in 15 minutes"));
    }

    #[test]
    fn test_invite_without_email_or_url() {
        let email = render(USER_INVITE, &json!({}), &HashMap::new()).unwrap();
        assert_eq!(email.subject, "You're invited to join");
        assert!(email.html.contains("Hello,"));
        assert!(email.html.contains("href=\"#\""));
        assert!(email.html.contains("Accept Invite"));
    }

    #[test]
    fn test_unknown_template() {
        assert!(render("order-placed", &json!({}), &HashMap::new()).is_none());
    }

    #[test]
    fn test_configured_override_with_placeholders() {
        let mut overrides = HashMap::new();
        overrides.insert(
            USER_INVITE.to_string(),
            HtmlTemplate {
                subject: Some("Join {{store}}".to_string()),
                content: "<a href=\"{{invite_url}}\">{{ email }}</a> {{missing}}".to_string(),
            },
        );

        let email = render(
            USER_INVITE,
            &json!({"invite_url": "https://x/app/invite?token=t", "email": "e@x.com", "store": "Potli"}),
            &overrides,
        )
        .unwrap();

        assert_eq!(email.subject, "Join Potli");
        assert_eq!(
            email.html,
            "<a href=\"https://x/app/invite?token=t\">e@x.com</a> {{missing}}"
        );
    }

    #[test]
    fn test_override_can_add_new_template() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "welcome".to_string(),
            HtmlTemplate { subject: None, content: "Hi {{n}}".to_string() },
        );
        let email = render("welcome", &json!({"n": 3}), &overrides).unwrap();
        assert_eq!(email.subject, "Notification");
        assert_eq!(email.html, "Hi 3");
    }

    #[test]
    fn test_substitute_unterminated() {
        assert_eq!(substitute("a {{b", &json!({"b": "x"})), "a {{b");
    }
}
