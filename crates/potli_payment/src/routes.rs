// --- File: crates/potli_payment/src/routes.rs ---

use crate::handlers::{
    cancel_payment_session_handler, capture_payment_session_handler,
    create_payment_session_handler, get_payment_session_handler, refund_payment_session_handler,
    PaymentState,
};
use crate::service::PaymentModule;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Storefront payment routes.
pub fn store_routes(payments: Arc<PaymentModule>) -> Router {
    let state = Arc::new(PaymentState { payments });

    Router::new()
        .route(
            "/store/carts/{cart_id}/payment-sessions",
            post(create_payment_session_handler),
        )
        .route("/store/payment-sessions/{id}", get(get_payment_session_handler))
        .with_state(state)
}

/// Admin payment routes. The caller layers admin authentication on top.
pub fn admin_routes(payments: Arc<PaymentModule>) -> Router {
    let state = Arc::new(PaymentState { payments });

    Router::new()
        .route(
            "/admin/payment-sessions/{id}/capture",
            post(capture_payment_session_handler),
        )
        .route(
            "/admin/payment-sessions/{id}/refund",
            post(refund_payment_session_handler),
        )
        .route(
            "/admin/payment-sessions/{id}/cancel",
            post(cancel_payment_session_handler),
        )
        .with_state(state)
}
