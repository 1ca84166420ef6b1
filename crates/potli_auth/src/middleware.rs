//! Bearer token middleware.
//!
//! [`authenticate`] is lenient: a valid token attaches an [`AuthContext`],
//! anything else passes through untouched. [`require_admin`] then guards the
//! admin surface.

use crate::jwt::{decode_token, AuthContext};
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use potli_common::message_response;
use potli_config::AppConfig;
use std::sync::Arc;
use tracing::debug;

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn authenticate(
    State(config): State<Arc<AppConfig>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let context = bearer_token(&req).and_then(|token| {
        decode_token(&config.http.jwt_secret, token)
            .map_err(|e| debug!("Ignoring bearer token: {}", e))
            .ok()
    });
    if let Some(context) = context {
        req.extensions_mut().insert(context);
    }
    next.run(req).await
}

/// 401 unless [`authenticate`] attached an admin context.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.is_admin() => next.run(req).await,
        _ => message_response(StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}
