use crate::logic::hmac_sha256_hex;
use crate::routes::routes;
use crate::service::RazorpayProviderService;
use crate::service_test::{config, payment_json, KEY_SECRET};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use potli_common::services::Boxed;
use potli_config::AppConfig;
use potli_db::{init_schemas, DbClient};
use potli_payment::{CreatePaymentSessionInput, PaymentModule};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    app: Router,
    payments: Arc<PaymentModule>,
    server: MockServer,
}

async fn harness(webhook_secret: Option<&str>) -> Harness {
    let server = MockServer::start().await;
    let mut razorpay = config(&server.uri());
    razorpay.webhook_secret = webhook_secret.map(str::to_string);

    let db = DbClient::in_memory().await.expect("in-memory sqlite");
    init_schemas(&db).await.expect("schemas");
    let provider = RazorpayProviderService::new(razorpay.clone()).unwrap();
    let payments = Arc::new(PaymentModule::new(db).with_provider(Arc::new(Boxed(provider))));

    let config = Arc::new(AppConfig {
        razorpay: Some(razorpay),
        ..Default::default()
    });
    Harness {
        app: routes(config, payments.clone()),
        payments,
        server,
    }
}

async fn open_session(h: &Harness, cart_id: &str) -> String {
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_1",
            "amount": 49900,
            "currency": "INR",
            "receipt": "receipt_1"
        })))
        .mount(&h.server)
        .await;

    h.payments
        .create_session(CreatePaymentSessionInput {
            cart_id: cart_id.to_string(),
            provider_id: "pp_razorpay_razorpay".to_string(),
            amount: 49900,
            currency_code: "inr".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

async fn post(app: &Router, uri: &str, headers: &[(&str, &str)], body: impl Into<Body>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let response = app
        .clone()
        .oneshot(request.body(body.into()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// --- Webhook ---

#[tokio::test]
async fn test_webhook_requires_signature_header() {
    let h = harness(Some("whsec")).await;
    let (status, body) = post(&h.app, "/webhooks/razorpay", &[], "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing Razorpay signature header");
}

#[tokio::test]
async fn test_webhook_without_secret_is_500() {
    let h = harness(None).await;
    let (status, body) =
        post(&h.app, "/webhooks/razorpay", &[("x-razorpay-signature", "abc")], "{}").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "RAZORPAY_WEBHOOK_SECRET is not configured");
}

#[tokio::test]
async fn test_webhook_rejects_bad_signature() {
    let h = harness(Some("whsec")).await;
    let (status, body) = post(
        &h.app,
        "/webhooks/razorpay",
        &[("x-razorpay-signature", "not-a-signature")],
        r#"{"event":"payment.captured"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid webhook signature");
}

#[tokio::test]
async fn test_webhook_accepts_signed_events() {
    let h = harness(Some("whsec")).await;

    for raw in [
        r#"{"event":"payment.captured","payload":{"payment":{"entity":{"id":"pay_1"}}}}"#,
        r#"{"event":"refund.processed","payload":{"refund":{"entity":{"id":"rfnd_1"}}}}"#,
        r#"{"event":"order.paid","payload":{}}"#,
    ] {
        let signature = hmac_sha256_hex("whsec", raw.as_bytes());
        let (status, body) = post(
            &h.app,
            "/webhooks/razorpay",
            &[("x-razorpay-signature", signature.as_str())],
            raw,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"received": true}));
    }
}

#[tokio::test]
async fn test_webhook_processing_failure_still_200() {
    let h = harness(Some("whsec")).await;
    let raw = "not json";
    let signature = hmac_sha256_hex("whsec", raw.as_bytes());
    let (status, body) = post(
        &h.app,
        "/webhooks/razorpay",
        &[("x-razorpay-signature", signature.as_str())],
        raw,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Webhook processing failed");
    assert!(body["message"].is_string());
}

// --- Verify ---

fn verify_body(cart_id: Option<&str>, signature: &str) -> String {
    let mut body = json!({
        "razorpay_payment_id": "pay_1",
        "razorpay_order_id": "order_1",
        "razorpay_signature": signature,
    });
    if let Some(cart_id) = cart_id {
        body["cart_id"] = json!(cart_id);
    }
    body.to_string()
}

#[tokio::test]
async fn test_verify_validates_input() {
    let h = harness(None).await;

    let (status, body) = post(
        &h.app,
        "/store/razorpay/verify",
        &[],
        json!({"razorpay_payment_id": "pay_1", "cart_id": "cart_1"}).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required payment verification data");

    let (status, body) = post(&h.app, "/store/razorpay/verify", &[], verify_body(None, "sig")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing cart_id");

    let (status, body) =
        post(&h.app, "/store/razorpay/verify", &[], verify_body(Some("cart_none"), "sig")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart payment collection not found");
    assert!(body["message"].as_str().unwrap().contains("select Razorpay again"));
}

#[tokio::test]
async fn test_verify_needs_open_razorpay_session() {
    let h = harness(None).await;
    let session_id = open_session(&h, "cart_1").await;
    h.payments.cancel_session(&session_id).await.unwrap();

    let (status, body) =
        post(&h.app, "/store/razorpay/verify", &[], verify_body(Some("cart_1"), "sig")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Razorpay payment session not found");
}

#[tokio::test]
async fn test_verify_authorizes_session() {
    let h = harness(None).await;
    let session_id = open_session(&h, "cart_1").await;
    Mock::given(method("GET"))
        .and(path("/payments/pay_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("pay_1", "order_1", "authorized")))
        .mount(&h.server)
        .await;

    let signature = hmac_sha256_hex(KEY_SECRET, b"order_1|pay_1");
    let (status, body) = post(
        &h.app,
        "/store/razorpay/verify",
        &[],
        verify_body(Some("cart_1"), &signature),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "payment_session_id": session_id, "status": "authorized"})
    );

    let stored = h.payments.retrieve_session(&session_id).await.unwrap();
    assert!(stored.authorized_at.is_some());
    assert_eq!(stored.data["razorpay_payment_id"], "pay_1");
}

#[tokio::test]
async fn test_verify_bad_signature_is_500() {
    let h = harness(None).await;
    open_session(&h, "cart_1").await;

    let (status, body) = post(
        &h.app,
        "/store/razorpay/verify",
        &[],
        verify_body(Some("cart_1"), "deadbeef"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Payment verification failed");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Invalid payment signature"));
}
