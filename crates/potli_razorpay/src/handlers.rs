use crate::logic::{verify_webhook_signature, WebhookEvent, HANDLED_EVENTS};
use crate::service::RazorpayProviderService;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use potli_common::models::{PaymentData, PaymentSessionStatus};
use potli_common::JsonResponse;
use potli_config::AppConfig;
use potli_payment::{is_provider_session, PaymentModule};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

#[derive(Clone)]
pub struct RazorpayState {
    pub config: Arc<AppConfig>,
    pub payments: Arc<PaymentModule>,
}

fn error_body(status: StatusCode, error: &str) -> JsonResponse {
    (status, Json(json!({ "error": error })))
}

// --- Webhook ---

#[axum::debug_handler]
pub async fn razorpay_webhook_handler(
    State(state): State<Arc<RazorpayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> JsonResponse {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        return error_body(StatusCode::BAD_REQUEST, "Missing Razorpay signature header");
    };

    let Some(secret) = state
        .config
        .razorpay
        .as_ref()
        .and_then(|c| c.webhook_secret.as_deref())
        .filter(|s| !s.is_empty())
    else {
        error!("Razorpay webhook received but no webhook secret is configured");
        return error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "RAZORPAY_WEBHOOK_SECRET is not configured",
        );
    };

    if !verify_webhook_signature(secret, &body, signature) {
        warn!("Rejected Razorpay webhook with an invalid signature");
        return error_body(StatusCode::UNAUTHORIZED, "Invalid webhook signature");
    }

    // Razorpay retries on non-2xx, so processing failures still answer 200.
    match serde_json::from_slice::<WebhookEvent>(&body) {
        Ok(event) => {
            log_webhook_event(&event);
            (StatusCode::OK, Json(json!({ "received": true })))
        }
        Err(e) => {
            error!("Razorpay webhook processing failed: {}", e);
            (
                StatusCode::OK,
                Json(json!({ "error": "Webhook processing failed", "message": e.to_string() })),
            )
        }
    }
}

fn log_webhook_event(event: &WebhookEvent) {
    let name = event.event.as_deref().unwrap_or_default();
    if !HANDLED_EVENTS.contains(&name) {
        info!("Unhandled Razorpay webhook event: {}", name);
        return;
    }
    let kind = if name.starts_with("refund.") { "refund" } else { "payment" };
    info!(
        "Razorpay webhook {} for {} {}",
        name,
        kind,
        event.entity_id(kind).unwrap_or("<unknown>")
    );
}

// --- Checkout verification ---

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct VerifyPaymentRequest {
    #[cfg_attr(feature = "openapi", schema(example = "pay_29QQoUBi66xm2f"))]
    pub razorpay_payment_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "order_9A33XWu170gUtm"))]
    pub razorpay_order_id: Option<String>,
    pub razorpay_signature: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "cart_01"))]
    pub cart_id: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Authorizes the cart's Razorpay session with what the checkout widget returned.
#[axum::debug_handler]
pub async fn verify_payment_handler(
    State(state): State<Arc<RazorpayState>>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> JsonResponse {
    let (Some(payment_id), Some(order_id), Some(signature)) = (
        present(&payload.razorpay_payment_id),
        present(&payload.razorpay_order_id),
        present(&payload.razorpay_signature),
    ) else {
        return error_body(
            StatusCode::BAD_REQUEST,
            "Missing required payment verification data",
        );
    };
    let Some(cart_id) = present(&payload.cart_id) else {
        return error_body(StatusCode::BAD_REQUEST, "Missing cart_id");
    };

    let verification_failed = |message: String| {
        error!("Razorpay verification for cart {} failed: {}", cart_id, message);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Payment verification failed", "message": message })),
        )
    };

    let collection = match state.payments.find_collection_by_cart(cart_id).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Cart payment collection not found",
                    "message": "The cart is missing a payment collection. Please go back to the \
                                Payment step and select Razorpay again (this creates a payment \
                                collection + session).",
                })),
            )
        }
        Err(e) => return verification_failed(e.to_string()),
    };

    let sessions = match state.payments.list_sessions(&collection.id).await {
        Ok(sessions) => sessions,
        Err(e) => return verification_failed(e.to_string()),
    };
    let Some(session) = sessions.iter().rev().find(|s| {
        is_provider_session(s, RazorpayProviderService::IDENTIFIER)
            && s.status != PaymentSessionStatus::Canceled
    }) else {
        return error_body(StatusCode::BAD_REQUEST, "Razorpay payment session not found");
    };

    let mut context = PaymentData::new();
    context.insert("razorpay_payment_id".into(), json!(payment_id));
    context.insert("razorpay_order_id".into(), json!(order_id));
    context.insert("razorpay_signature".into(), json!(signature));

    match state.payments.authorize_session(&session.id, context).await {
        Ok(session) => {
            info!("Cart {} paid with Razorpay session {}", cart_id, session.id);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "payment_session_id": session.id,
                    "status": "authorized",
                })),
            )
        }
        Err(e) => verification_failed(e.to_string()),
    }
}
