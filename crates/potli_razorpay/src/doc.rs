// --- File: crates/potli_razorpay/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use crate::handlers::VerifyPaymentRequest;
use crate::logic::WebhookEvent;
use utoipa::OpenApi;

#[utoipa::path(
    post,
    path = "/webhooks/razorpay",
    request_body(content = WebhookEvent, example = json!({
        "event": "payment.captured",
        "payload": {"payment": {"entity": {"id": "pay_29QQoUBi66xm2f", "amount": 49900}}}
    })),
    params(("x-razorpay-signature" = String, Header, description = "HMAC-SHA256 of the raw body")),
    responses(
        (status = 200, description = "Event received, or processing failed after verification"),
        (status = 400, description = "Missing Razorpay signature header"),
        (status = 401, description = "Invalid webhook signature"),
        (status = 500, description = "RAZORPAY_WEBHOOK_SECRET is not configured")
    ),
    tag = "Razorpay"
)]
fn doc_razorpay_webhook_handler() {}

#[utoipa::path(
    post,
    path = "/store/razorpay/verify",
    request_body(content = VerifyPaymentRequest, example = json!({
        "razorpay_payment_id": "pay_29QQoUBi66xm2f",
        "razorpay_order_id": "order_9A33XWu170gUtm",
        "razorpay_signature": "9ef4dffbfd84f1318f6739a3ce19f9d85851857ae648f114332d8401e0949a3d",
        "cart_id": "cart_01"
    })),
    responses(
        (status = 200, description = "{success, payment_session_id, status}"),
        (status = 400, description = "Missing fields, payment collection or Razorpay session"),
        (status = 500, description = "Payment verification failed")
    ),
    tag = "Razorpay"
)]
fn doc_verify_payment_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_razorpay_webhook_handler, doc_verify_payment_handler),
    components(schemas(WebhookEvent, VerifyPaymentRequest)),
    tags((name = "Razorpay", description = "Razorpay checkout verification and webhooks"))
)]
pub struct RazorpayApiDoc;
