use crate::gate::SettingsGate;
use crate::handlers::AccessState;
use crate::error::AccessError;
use crate::invites::{AcceptInvite, InviteService};
use crate::middleware::{require_settings_access, DENIED_MESSAGE};
use crate::routes::{admin_routes, public_routes};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::{middleware, Router};
use chrono::{Duration, Utc};
use potli_auth::{authenticate, decode_token, issue_token, require_admin, ADMIN_ACTOR, CUSTOMER_ACTOR};
use potli_common::models::{AdminUser, Metadata};
use potli_common::{DomainEvent, EventBus};
use potli_config::AppConfig;
use potli_db::{generate_id, init_schemas, DbClient, Repository, SqlUserRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub(crate) struct Harness {
    pub app: Router,
    pub config: Arc<AppConfig>,
    pub db: DbClient,
    pub events: EventBus,
}

pub(crate) async fn harness() -> Harness {
    let db = DbClient::in_memory().await.unwrap();
    init_schemas(&db).await.unwrap();
    let mut config = AppConfig::default();
    config.settings_access.allowed_emails = vec!["owner@shop.com".to_string()];
    let config = Arc::new(config);
    let events = EventBus::new(16);

    let state = Arc::new(AccessState {
        config: config.clone(),
        gate: SettingsGate::new(
            &config.settings_access.allowed_emails,
            SqlUserRepository::new(db.clone()),
        ),
        invites: InviteService::new(db.clone(), events.clone()),
    });

    let admin = admin_routes(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), require_settings_access))
        .layer(middleware::from_fn(require_admin));
    let app = admin
        .merge(public_routes(state))
        .layer(middleware::from_fn_with_state(config.clone(), authenticate));

    Harness { app, config, db, events }
}

pub(crate) async fn insert_user(db: &DbClient, email: &str, metadata: Value) -> AdminUser {
    let now = Utc::now();
    SqlUserRepository::new(db.clone())
        .create(AdminUser {
            id: generate_id("user"),
            email: email.to_string(),
            first_name: None,
            last_name: None,
            metadata: serde_json::from_value::<Metadata>(metadata).unwrap(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

fn bearer(h: &Harness, actor_id: &str, actor_type: &str) -> String {
    issue_token(&h.config.http.jwt_secret, actor_id, actor_type, Duration::hours(1)).unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_gate_blocks_restricted_sections() {
    let h = harness().await;
    let owner = insert_user(&h.db, "owner@shop.com", json!({})).await;
    let flagged = insert_user(&h.db, "dev@shop.com", json!({"can_access_users_developer": true})).await;
    let staff = insert_user(&h.db, "staff@shop.com", json!({})).await;

    for user in [&owner, &flagged] {
        let token = bearer(&h, &user.id, ADMIN_ACTOR);
        let (status, body) = send(&h.app, request("GET", "/admin/users", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK, "{}", user.email);
        assert_eq!(body["count"], 3);
    }

    let token = bearer(&h, &staff.id, ADMIN_ACTOR);
    for uri in ["/admin/users", "/admin/invites"] {
        let (status, body) = send(&h.app, request("GET", uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["message"], DENIED_MESSAGE);
        assert_eq!(body["type"], "authorization_error");
    }

    let (status, _) = send(&h.app, request("GET", "/admin/users", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let customer = bearer(&h, "cus_1", CUSTOMER_ACTOR);
    let (status, _) = send(&h.app, request("GET", "/admin/users", Some(&customer), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_permissions() {
    let h = harness().await;
    let owner = insert_user(&h.db, "owner@shop.com", json!({})).await;
    let staff = insert_user(&h.db, "staff@shop.com", json!({})).await;

    let (status, body) = send(&h.app, request("GET", "/admin/custom/me-permissions", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"can_access_users_developer": false}));

    let token = bearer(&h, &owner.id, ADMIN_ACTOR);
    let (_, body) = send(&h.app, request("GET", "/admin/custom/me-permissions", Some(&token), None)).await;
    assert_eq!(body["can_access_users_developer"], true);

    let token = bearer(&h, &staff.id, ADMIN_ACTOR);
    let (_, body) = send(&h.app, request("GET", "/admin/custom/me-permissions", Some(&token), None)).await;
    assert_eq!(body["can_access_users_developer"], false);
}

#[tokio::test]
async fn test_update_settings_access() {
    let h = harness().await;
    let owner = insert_user(&h.db, "owner@shop.com", json!({})).await;
    let staff = insert_user(&h.db, "staff@shop.com", json!({"team": "ops"})).await;
    let uri = format!("/admin/custom/users/{}/settings-access", staff.id);
    let grant = json!({"can_access_users_developer": true});

    let (status, _) = send(&h.app, request("PATCH", &uri, None, Some(grant.clone()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let staff_token = bearer(&h, &staff.id, ADMIN_ACTOR);
    let (status, body) = send(&h.app, request("PATCH", &uri, Some(&staff_token), Some(grant.clone()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You do not have permission to change this setting.");

    let owner_token = bearer(&h, &owner.id, ADMIN_ACTOR);
    let (status, body) = send(
        &h.app,
        request("PATCH", &uri, Some(&owner_token), Some(json!({"can_access_users_developer": "yes"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "invalid_data");

    let (status, body) = send(
        &h.app,
        request("PATCH", "/admin/custom/users/user_missing/settings-access", Some(&owner_token), Some(grant.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = send(&h.app, request("PATCH", &uri, Some(&owner_token), Some(grant))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": staff.id, "can_access_users_developer": true}));

    let stored = SqlUserRepository::new(h.db.clone()).read(&staff.id).await.unwrap().unwrap();
    assert_eq!(stored.metadata["can_access_users_developer"], true);
    assert_eq!(stored.metadata["team"], "ops");

    // Now passes the gate.
    let (status, _) = send(&h.app, request("GET", "/admin/users", Some(&staff_token), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invite_lifecycle() {
    let h = harness().await;
    let mut rx = h.events.subscribe();
    let owner = insert_user(&h.db, "owner@shop.com", json!({})).await;
    let token = bearer(&h, &owner.id, ADMIN_ACTOR);

    let (status, body) = send(&h.app, request("POST", "/admin/invites", Some(&token), Some(json!({})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is required");

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            "/admin/invites",
            Some(&token),
            Some(json!({"email": "New@Shop.com", "metadata": {"can_access_users_developer": true}})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let invite = body["invite"].clone();
    assert_eq!(invite["email"], "new@shop.com");
    let invite_id = invite["id"].as_str().unwrap().to_string();
    let invite_token = invite["token"].as_str().unwrap().to_string();
    assert_eq!(rx.try_recv().unwrap(), DomainEvent::InviteCreated { id: invite_id.clone() });

    let (_, body) = send(&h.app, request("GET", "/admin/invites", Some(&token), None)).await;
    assert_eq!(body["count"], 1);

    let (status, body) = send(
        &h.app,
        request("POST", "/admin/invites/accept", None, Some(json!({"token": "nope"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired invite token.");

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            "/admin/invites/accept",
            None,
            Some(json!({"token": invite_token, "first_name": "Nia"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "new@shop.com");
    assert_eq!(body["user"]["first_name"], "Nia");
    let session = decode_token(&h.config.http.jwt_secret, body["token"].as_str().unwrap()).unwrap();
    assert_eq!(session.actor_id, body["user"]["id"].as_str().unwrap());
    assert_eq!(session.actor_type, ADMIN_ACTOR);
    assert_eq!(rx.try_recv().unwrap(), DomainEvent::InviteAccepted { id: invite_id });

    // Single use.
    let (status, _) = send(
        &h.app,
        request("POST", "/admin/invites/accept", None, Some(json!({"token": invite_token}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_accepting_with_a_taken_email_conflicts() {
    let h = harness().await;
    insert_user(&h.db, "taken@shop.com", json!({})).await;
    let invites = InviteService::new(h.db.clone(), h.events.clone());
    let invite = invites.create_invite("taken@shop.com", Metadata::new()).await.unwrap();

    let (status, body) = send(
        &h.app,
        request("POST", "/admin/invites/accept", None, Some(json!({"token": invite.token}))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this email already exists");
    let reopened = invites.list_invites().await.unwrap();
    assert!(!reopened[0].accepted);
}

#[tokio::test]
async fn test_accepted_user_keeps_the_invited_email() {
    let h = harness().await;
    let invites = InviteService::new(h.db.clone(), h.events.clone());
    let invite = invites.create_invite("new@shop.com", Metadata::new()).await.unwrap();

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            "/admin/invites/accept",
            None,
            Some(json!({"token": invite.token, "email": "owner@shop.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email does not match the invite");
    assert!(invites.list_users().await.unwrap().is_empty());

    let (status, body) = send(
        &h.app,
        request(
            "POST",
            "/admin/invites/accept",
            None,
            Some(json!({"token": invite.token, "email": "NEW@shop.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "new@shop.com");
}

#[tokio::test]
async fn test_concurrent_accepts_create_one_user() {
    let h = harness().await;
    let invites = InviteService::new(h.db.clone(), h.events.clone());
    let invite = invites.create_invite("new@shop.com", Metadata::new()).await.unwrap();
    let accept = || {
        invites.accept(AcceptInvite {
            token: Some(invite.token.clone()),
            ..Default::default()
        })
    };

    let (first, second) = tokio::join!(accept(), accept());
    assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    let loser = if first.is_ok() { second } else { first };
    assert!(matches!(loser, Err(AccessError::InvalidInvite)));
    assert_eq!(invites.list_users().await.unwrap().len(), 1);
}
