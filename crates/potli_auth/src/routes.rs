// --- File: crates/potli_auth/src/routes.rs ---

use crate::handlers::{
    check_email_verified_handler, create_customer_handler, login_handler, reset_password_handler,
    verify_email_handler, AuthState,
};
use axum::{
    routing::{get, post},
    Router,
};
use potli_common::EventBus;
use potli_config::AppConfig;
use potli_db::DbClient;
use std::sync::Arc;

/// Storefront endpoints, served under the store CORS policy.
pub fn store_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/store/customers", post(create_customer_handler))
        .route(
            "/store/auth/check-email-verified",
            post(check_email_verified_handler),
        )
        .with_state(state)
}

/// `/auth/*` endpoints, served under the auth CORS policy.
pub fn auth_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/auth/verify-email", get(verify_email_handler))
        .route("/auth/login", post(login_handler))
        .route(
            "/auth/{actor_type}/emailpass/reset-password",
            post(reset_password_handler),
        )
        .with_state(state)
}

pub fn routes(config: Arc<AppConfig>, db: DbClient, events: EventBus) -> Router {
    let state = Arc::new(AuthState::new(config, db, events));
    store_routes(state.clone()).merge(auth_routes(state))
}
