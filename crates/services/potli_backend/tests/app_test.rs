use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use potli_auth::{issue_token, ADMIN_ACTOR, CUSTOMER_ACTOR};
use potli_backend::{build_router, AppState};
use potli_common::services::ServiceFactory;
use potli_config::{AppConfig, DatabaseConfig};
use potli_db::{init_schemas, DbClient};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app_with(config: AppConfig) -> Router {
    let db = DbClient::in_memory().await.unwrap();
    init_schemas(&db).await.unwrap();
    let state = AppState::builder(Arc::new(config), db).build();
    build_router(&state)
}

fn config_with_database() -> AppConfig {
    let mut config = AppConfig::default();
    config.database = Some(DatabaseConfig {
        url: "sqlite::memory:".to_string(),
    });
    config
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn admin_token(config: &AppConfig, actor_type: &str) -> String {
    issue_token(&config.http.jwt_secret, "user_1", actor_type, Duration::hours(1)).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_and_locales() {
    let app = app_with(AppConfig::default()).await;

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));

    let response = app.oneshot(get("/store/locales")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "locales": [] }));
}

#[tokio::test]
async fn test_root_redirects_to_landing_page() {
    let app = app_with(AppConfig::default()).await;

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/home");

    let response = app.oneshot(get("/home")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=60");
    let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert!(html.contains("Techpotli Admin Panel"));
    assert!(html.contains(r#"href="/app""#));
    assert!(html.contains(r#"src="/mn.png""#));
}

#[tokio::test]
async fn test_logo_served_from_public_dir() {
    let dir = std::env::temp_dir().join(format!("potli-public-{}", unique_suffix()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut config = AppConfig::default();
    config.server.public_dir = dir.to_string_lossy().into_owned();

    let app = app_with(config).await;
    let response = app.clone().oneshot(get("/mn.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Not found");

    std::fs::write(dir.join("mn.png"), b"\x89PNG fake").unwrap();
    let response = app.oneshot(get("/mn.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=86400");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"\x89PNG fake");

    std::fs::remove_dir_all(&dir).ok();
}

fn unique_suffix() -> String {
    format!(
        "{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

#[tokio::test]
async fn test_admin_routes_need_admin_token() {
    let config = AppConfig::default();
    let customer = admin_token(&config, CUSTOMER_ACTOR);
    let app = app_with(config).await;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/payment-sessions/payses_1/capture")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Unauthorized");

    let request = Request::builder()
        .method("POST")
        .uri("/admin/payment-sessions/payses_1/cancel")
        .header(header::AUTHORIZATION, format!("Bearer {customer}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[cfg(feature = "settings_access")]
#[tokio::test]
async fn test_admin_users_listed_without_gate() {
    let config = AppConfig::default();
    let token = admin_token(&config, ADMIN_ACTOR);
    let app = app_with(config).await;

    let request = Request::builder()
        .uri("/admin/users")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], 0);
}

#[cfg(feature = "settings_access")]
#[tokio::test]
async fn test_settings_gate_applies_when_enabled() {
    let mut config = config_with_database();
    config.use_settings_access = true;
    let token = admin_token(&config, ADMIN_ACTOR);
    let app = app_with(config).await;

    let request = Request::builder()
        .uri("/admin/users")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["type"], "authorization_error");
}

#[cfg(feature = "hero_banner")]
#[tokio::test]
async fn test_hero_banners_mounted_only_when_enabled() {
    let app = app_with(AppConfig::default()).await;
    let response = app.oneshot(get("/store/hero-banners")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mut config = config_with_database();
    config.use_hero_banners = true;
    let app = app_with(config).await;
    let response = app.oneshot(get("/store/hero-banners")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "count": 0, "banners": [] }));
}

#[tokio::test]
async fn test_store_cors_allows_listed_origins_only() {
    let app = app_with(AppConfig::default()).await;

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/store/locales")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(preflight("http://localhost:3000")).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let response = app.oneshot(preflight("https://evil.example.com")).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_registration_reaches_auth_routes() {
    let app = app_with(AppConfig::default()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/store/customers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": "Asha@Example.com" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["customer"]["email"], "asha@example.com");
}

#[tokio::test]
async fn test_default_factory_has_no_vendor_providers() {
    let db = DbClient::in_memory().await.unwrap();
    let state = AppState::builder(Arc::new(AppConfig::default()), db).build();
    assert!(state.service_factory.payment_providers().is_empty());
    assert!(state.payments.provider_ids().is_empty());
    assert_eq!(state.spawn_subscribers().len(), 1);
}

#[cfg(feature = "razorpay")]
#[tokio::test]
async fn test_razorpay_routes_follow_provider_registration() {
    let webhook = || {
        Request::builder()
            .method("POST")
            .uri("/webhooks/razorpay")
            .body(Body::from("{}"))
            .unwrap()
    };

    let mut config = AppConfig::default();
    config.use_razorpay = true;
    config.razorpay = Some(Default::default());
    let app = app_with(config.clone()).await;
    let response = app.oneshot(webhook()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    config.razorpay = Some(potli_config::RazorpayConfig {
        key_id: "rzp_test_key".into(),
        key_secret: "rzp_secret".into(),
        ..Default::default()
    });
    let app = app_with(config).await;
    let response = app.oneshot(webhook()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Missing Razorpay signature header"
    );
}
