// --- File: crates/potli_payment/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use crate::handlers::{CreatePaymentSessionRequest, RefundRequest};
use potli_common::models::{PaymentSession, PaymentSessionStatus};
use utoipa::OpenApi;

#[utoipa::path(
    post,
    path = "/store/carts/{cart_id}/payment-sessions",
    params(("cart_id" = String, Path, description = "Cart the session pays for")),
    request_body(content = CreatePaymentSessionRequest, example = json!({
        "provider_id": "pp_razorpay_razorpay",
        "amount": 49900,
        "currency_code": "inr",
        "region_id": "reg_01"
    })),
    responses(
        (status = 200, description = "Session opened, wrapped as {payment_session}"),
        (status = 400, description = "Unknown provider or invalid amount"),
        (status = 502, description = "Provider rejected the request")
    ),
    tag = "Payments"
)]
fn doc_create_payment_session_handler() {}

#[utoipa::path(
    get,
    path = "/store/payment-sessions/{id}",
    params(("id" = String, Path, description = "Payment session id")),
    responses(
        (status = 200, description = "Session with refreshed status", body = PaymentSession),
        (status = 404, description = "Unknown session")
    ),
    tag = "Payments"
)]
fn doc_get_payment_session_handler() {}

#[utoipa::path(
    post,
    path = "/admin/payment-sessions/{id}/capture",
    params(("id" = String, Path, description = "Payment session id")),
    responses(
        (status = 200, description = "Captured session", body = PaymentSession),
        (status = 400, description = "Session is not authorized"),
        (status = 401, description = "Missing or invalid admin token")
    ),
    tag = "Payments Admin"
)]
fn doc_capture_payment_session_handler() {}

#[utoipa::path(
    post,
    path = "/admin/payment-sessions/{id}/refund",
    params(("id" = String, Path, description = "Payment session id")),
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund recorded on the session", body = PaymentSession),
        (status = 400, description = "Invalid amount or session not captured")
    ),
    tag = "Payments Admin"
)]
fn doc_refund_payment_session_handler() {}

#[utoipa::path(
    post,
    path = "/admin/payment-sessions/{id}/cancel",
    params(("id" = String, Path, description = "Payment session id")),
    responses((status = 200, description = "Canceled session", body = PaymentSession)),
    tag = "Payments Admin"
)]
fn doc_cancel_payment_session_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_payment_session_handler,
        doc_get_payment_session_handler,
        doc_capture_payment_session_handler,
        doc_refund_payment_session_handler,
        doc_cancel_payment_session_handler,
    ),
    components(schemas(CreatePaymentSessionRequest, RefundRequest, PaymentSession, PaymentSessionStatus)),
    tags(
        (name = "Payments", description = "Storefront payment sessions"),
        (name = "Payments Admin", description = "Capture, refund and cancel")
    )
)]
pub struct PaymentApiDoc;
