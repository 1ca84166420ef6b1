use crate::service::ResendNotificationService;
use crate::ResendError;
use potli_common::services::{Notification, NotificationContent, NotificationProvider};
use potli_config::ResendConfig;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base: &str) -> ResendConfig {
    ResendConfig {
        api_key: "re_test_key".to_string(),
        from: "noreply@techpotli.com".to_string(),
        api_base_url: Some(base.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_options_are_validated() {
    let err = ResendNotificationService::new(ResendConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "api_key is required");

    let err = ResendNotificationService::new(ResendConfig {
        api_key: "re_x".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "from is required");
}

#[tokio::test]
async fn test_sends_password_reset_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .and(body_partial_json(json!({
            "from": "noreply@techpotli.com",
            "to": ["jane@example.com"],
            "subject": "Reset Your Password"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "email_123"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = ResendNotificationService::new(config(&server.uri())).unwrap();
    let result = service
        .send(Notification::email(
            "jane@example.com",
            "password-reset",
            json!({"reset_url": "https://shop.test/reset-password?token=t", "email": "jane@example.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(result.id.as_deref(), Some("email_123"));
}

#[tokio::test]
async fn test_prebuilt_content_is_sent_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(json!({
            "subject": "Verify your email address",
            "html": "<p>hi</p>",
            "text": "hi"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "email_9"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = ResendNotificationService::new(config(&server.uri())).unwrap();
    let mut notification = Notification::email("a@b.com", "", json!({}));
    notification.content = Some(NotificationContent {
        subject: "Verify your email address".to_string(),
        html: "<p>hi</p>".to_string(),
        text: Some("hi".to_string()),
    });

    let result = service.send(notification).await.unwrap();
    assert_eq!(result.id.as_deref(), Some("email_9"));
}

#[tokio::test]
async fn test_unknown_template_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = ResendNotificationService::new(config(&server.uri())).unwrap();
    let result = service
        .send(Notification::email("a@b.com", "order-placed", json!({})))
        .await
        .unwrap();
    assert!(result.id.is_none());
}

#[tokio::test]
async fn test_missing_recipient_is_an_error() {
    let service = ResendNotificationService::new(config("http://127.0.0.1:9")).unwrap();
    let err = service
        .send(Notification::email("", "password-reset", json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, ResendError::InvalidData(_)));
}

#[tokio::test]
async fn test_api_rejection_returns_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "invalid from"})))
        .mount(&server)
        .await;

    let service = ResendNotificationService::new(config(&server.uri())).unwrap();
    let result = service
        .send(Notification::email("a@b.com", "user-invite", json!({})))
        .await
        .unwrap();
    assert!(result.id.is_none());
}
