use crate::gate::is_restricted_path;
use crate::handlers::AccessState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use potli_auth::AuthContext;
use potli_common::message_response;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

pub const DENIED_MESSAGE: &str = "You do not have permission to access Users or Developer sections.";

/// Guards the Users and Developer sections. Runs after the bearer middleware.
pub async fn require_settings_access(
    State(state): State<Arc<AccessState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !is_restricted_path(req.uri().path()) {
        return next.run(req).await;
    }

    let actor = req
        .extensions()
        .get::<AuthContext>()
        .filter(|ctx| ctx.is_admin())
        .map(|ctx| ctx.actor_id.clone());
    let Some(actor) = actor else {
        return message_response(StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    };

    match state.gate.can_access(&actor).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            warn!("{} denied access to {}", actor, req.uri().path());
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": DENIED_MESSAGE, "type": "authorization_error" })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Settings access check failed: {}", e);
            message_response(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
                .into_response()
        }
    }
}
