// --- File: crates/services/potli_backend/src/site.rs ---
//! Landing page, health check and the other small routes outside the
//! feature crates.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use potli_config::AppConfig;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

const LANDING_HTML: &str = include_str!("assets/landing.html");
const LOGO_FILE: &str = "mn.png";

async fn root_handler() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/home")]).into_response()
}

async fn home_handler() -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=60"),
        ],
        LANDING_HTML,
    )
        .into_response()
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// No locales are configured; the storefront falls back to its default.
async fn locales_handler() -> Json<Value> {
    Json(json!({ "locales": [] }))
}

async fn logo_handler(State(config): State<Arc<AppConfig>>) -> Response {
    let path = Path::new(&config.server.public_dir).join(LOGO_FILE);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "public, max-age=86400"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {}", path.display(), e);
            }
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

/// `/store/locales` is returned separately so it can share the store CORS layer.
pub fn store_routes() -> Router {
    Router::new().route("/store/locales", get(locales_handler))
}

pub fn site_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/home", get(home_handler))
        .route("/health", get(health_handler))
        .route("/mn.png", get(logo_handler))
        .with_state(config)
}
