use crate::jwt::{issue_reset_token, ADMIN_ACTOR, CUSTOMER_ACTOR};
use crate::token::verify_verification_token;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use potli_common::models::{Customer, Metadata};
use potli_common::{failure_response, message_response, DomainEvent, EventBus, JsonResponse};
use potli_config::AppConfig;
use potli_db::{
    generate_id, CustomerRepository, DbClient, DbError, Repository, SqlCustomerRepository,
    SqlUserRepository, UserRepository,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// Storefront fallback when `FRONTEND_URL` is unset.
pub const DEFAULT_VERIFY_FRONTEND_URL: &str = "http://localhost:8000";

pub const EMAIL_NOT_VERIFIED_MESSAGE: &str = "We’ve sent you a verification link. Please check your email inbox and verify your account before signing in.";

#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AppConfig>,
    pub customers: SqlCustomerRepository,
    pub users: SqlUserRepository,
    pub events: EventBus,
}

impl AuthState {
    pub fn new(config: Arc<AppConfig>, db: DbClient, events: EventBus) -> Self {
        Self {
            config,
            customers: SqlCustomerRepository::new(db.clone()),
            users: SqlUserRepository::new(db),
            events,
        }
    }

    fn verify_redirect(&self, query: &str) -> Response {
        let base = self.config.urls.frontend_url_or(DEFAULT_VERIFY_FRONTEND_URL);
        let location = format!(
            "{}{}?{}",
            base.trim_end_matches('/'),
            self.config.urls.frontend_verify_redirect_path,
            query
        );
        (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
    }
}

/// `true` or `"true"`; anything else counts as unverified.
pub fn is_email_verified(metadata: &Metadata) -> bool {
    match metadata.get("email_verified") {
        Some(Value::Bool(verified)) => *verified,
        Some(Value::String(verified)) => verified == "true",
        _ => false,
    }
}

// --- Email verification ---

#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[derive(Deserialize, Debug, Default)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

enum VerifyOutcome {
    Verified,
    AlreadyVerified,
    Rejected(&'static str),
}

async fn consume_token(state: &AuthState, token: &str) -> Result<VerifyOutcome, DbError> {
    let Some(payload) = verify_verification_token(&state.config.http.jwt_secret, token) else {
        return Ok(VerifyOutcome::Rejected("invalid_or_expired_token"));
    };

    let Some(mut customer) = state.customers.read(&payload.customer_id).await? else {
        return Ok(VerifyOutcome::Rejected("customer_not_found"));
    };

    if customer.metadata.get("email_verified") == Some(&Value::Bool(true)) {
        return Ok(VerifyOutcome::AlreadyVerified);
    }
    if customer.email != payload.email {
        return Ok(VerifyOutcome::Rejected("email_mismatch"));
    }
    // Only the most recently issued token is accepted.
    if customer.metadata.get("verification_token").and_then(Value::as_str) != Some(token) {
        return Ok(VerifyOutcome::Rejected("invalid_or_expired_token"));
    }

    let now = Utc::now();
    customer.metadata.insert("email_verified".into(), Value::Bool(true));
    customer
        .metadata
        .insert("email_verified_at".into(), Value::String(now.timestamp_millis().to_string()));
    customer.metadata.remove("verification_token");
    customer.metadata.remove("verification_token_created_at");
    customer.updated_at = now;
    state.customers.update(customer).await?;

    info!("Email verified for customer {}", payload.customer_id);
    Ok(VerifyOutcome::Verified)
}

/// Consumes an emailed verification link and redirects to the storefront.
#[axum::debug_handler]
pub async fn verify_email_handler(
    State(state): State<Arc<AuthState>>,
    Query(query): Query<VerifyEmailQuery>,
) -> Response {
    let Some(token) = query.token.filter(|t| !t.is_empty()) else {
        return state.verify_redirect("error=invalid_token");
    };

    match consume_token(&state, &token).await {
        Ok(VerifyOutcome::Verified) => state.verify_redirect("verified=true"),
        Ok(VerifyOutcome::AlreadyVerified) => {
            state.verify_redirect("verified=true&message=already_verified")
        }
        Ok(VerifyOutcome::Rejected(code)) => state.verify_redirect(&format!("error={code}")),
        Err(e) => {
            error!("Email verification error: {}", e);
            state.verify_redirect("error=verification_failed")
        }
    }
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct CheckEmailRequest {
    pub email: Option<String>,
}

/// Tells the storefront whether a customer may sign in yet.
#[axum::debug_handler]
pub async fn check_email_verified_handler(
    State(state): State<Arc<AuthState>>,
    body: Result<Json<CheckEmailRequest>, JsonRejection>,
) -> JsonResponse {
    let email = body
        .ok()
        .and_then(|Json(req)| req.email)
        .filter(|email| !email.trim().is_empty());
    let Some(email) = email else {
        return message_response(StatusCode::BAD_REQUEST, "Email is required");
    };

    match state.customers.find_by_email(&email).await {
        // Unknown emails may still try; registration reports its own errors.
        Ok(None) => (StatusCode::OK, Json(json!({ "can_login": true }))),
        Ok(Some(customer)) if is_email_verified(&customer.metadata) => {
            (StatusCode::OK, Json(json!({ "can_login": true })))
        }
        Ok(Some(_)) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "can_login": false,
                "code": "EMAIL_NOT_VERIFIED",
                "message": EMAIL_NOT_VERIFIED_MESSAGE,
            })),
        ),
        Err(e) => {
            error!("check-email-verified error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "can_login": false,
                    "message": "Unable to verify email status. Please try again.",
                })),
            )
        }
    }
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Retired password login; kept so old clients get a clear answer.
#[axum::debug_handler]
pub async fn login_handler(body: Result<Json<LoginRequest>, JsonRejection>) -> JsonResponse {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    if !present(&req.email) || !present(&req.password) {
        return message_response(StatusCode::BAD_REQUEST, "Email and password are required");
    }

    (
        StatusCode::GONE,
        Json(json!({
            "message": "This login endpoint is deprecated. Please use the standard auth endpoint.",
            "code": "DEPRECATED_ENDPOINT",
        })),
    )
}

// --- Registration ---

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct CreateCustomerRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub metadata: Option<Metadata>,
}

/// Registers a storefront customer and emits `customer.created`.
#[axum::debug_handler]
pub async fn create_customer_handler(
    State(state): State<Arc<AuthState>>,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> JsonResponse {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return message_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let Some(email) = req.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) else {
        return message_response(StatusCode::BAD_REQUEST, "Email is required");
    };

    let now = Utc::now();
    let customer = Customer {
        id: generate_id("cus"),
        email,
        first_name: req.first_name,
        last_name: req.last_name,
        has_account: true,
        metadata: req.metadata.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    match state.customers.create(customer).await {
        Ok(customer) => {
            state.events.emit(DomainEvent::CustomerCreated {
                id: customer.id.clone(),
            });
            (StatusCode::OK, Json(json!({ "customer": customer })))
        }
        Err(DbError::Duplicate(_)) => message_response(
            StatusCode::CONFLICT,
            "Customer with this email already exists",
        ),
        Err(e) => {
            error!("Failed to create customer: {}", e);
            failure_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create customer", e)
        }
    }
}

// --- Password reset ---

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct ResetPasswordRequest {
    pub identifier: Option<String>,
}

async fn identity_exists(state: &AuthState, actor_type: &str, identifier: &str) -> Result<bool, DbError> {
    match actor_type {
        CUSTOMER_ACTOR => Ok(state.customers.find_by_email(identifier).await?.is_some()),
        ADMIN_ACTOR => Ok(state.users.find_by_email(identifier).await?.is_some()),
        _ => Ok(false),
    }
}

/// Starts a password reset. Answers 201 whether or not the identity exists.
#[axum::debug_handler]
pub async fn reset_password_handler(
    State(state): State<Arc<AuthState>>,
    Path(actor_type): Path<String>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> StatusCode {
    let identifier = body
        .ok()
        .and_then(|Json(req)| req.identifier)
        .map(|id| id.trim().to_lowercase())
        .filter(|id| !id.is_empty());
    let Some(identifier) = identifier else {
        return StatusCode::CREATED;
    };

    match identity_exists(&state, &actor_type, &identifier).await {
        Ok(true) => match issue_reset_token(&state.config.http.jwt_secret, &identifier, &actor_type) {
            Ok(token) => state.events.emit(DomainEvent::PasswordReset {
                entity_id: identifier,
                token,
                actor_type,
            }),
            Err(e) => error!("Failed to issue reset token: {}", e),
        },
        Ok(false) => info!("Password reset requested for unknown {} identity", actor_type),
        Err(e) => warn!("Password reset lookup failed: {}", e),
    }
    StatusCode::CREATED
}
