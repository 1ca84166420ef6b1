// --- File: crates/potli_razorpay/src/routes.rs ---

use crate::handlers::{razorpay_webhook_handler, verify_payment_handler, RazorpayState};
use axum::{routing::post, Router};
use potli_config::AppConfig;
use potli_payment::PaymentModule;
use std::sync::Arc;

/// Webhook and checkout verification routes.
pub fn routes(config: Arc<AppConfig>, payments: Arc<PaymentModule>) -> Router {
    let state = Arc::new(RazorpayState { config, payments });

    Router::new()
        .route("/webhooks/razorpay", post(razorpay_webhook_handler))
        .route("/store/razorpay/verify", post(verify_payment_handler))
        .with_state(state)
}
