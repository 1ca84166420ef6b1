// --- File: crates/potli_access/src/routes.rs ---

use crate::handlers::{
    accept_invite_handler, create_invite_handler, list_invites_handler, list_users_handler,
    me_permissions_handler, update_settings_access_handler, AccessState,
};
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// Needs an admin session. The caller layers admin auth and
/// [`require_settings_access`](crate::middleware::require_settings_access) on top.
pub fn admin_routes(state: Arc<AccessState>) -> Router {
    Router::new()
        .route("/admin/users", get(list_users_handler))
        .route(
            "/admin/invites",
            get(list_invites_handler).post(create_invite_handler),
        )
        .route(
            "/admin/custom/users/{id}/settings-access",
            patch(update_settings_access_handler),
        )
        .with_state(state)
}

/// Reachable without an admin session.
pub fn public_routes(state: Arc<AccessState>) -> Router {
    Router::new()
        .route("/admin/custom/me-permissions", get(me_permissions_handler))
        .route("/admin/invites/accept", post(accept_invite_handler))
        .with_state(state)
}
