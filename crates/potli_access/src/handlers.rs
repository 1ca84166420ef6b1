use crate::error::AccessError;
use crate::gate::{SettingsGate, ACCESS_FLAG};
use crate::invites::{AcceptInvite, InviteService};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Duration;
use potli_auth::{issue_token, AuthContext, ADMIN_ACTOR};
use potli_common::models::Metadata;
use potli_common::{failure_response, message_response, HttpStatusCode, JsonResponse};
use potli_config::AppConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Lifetime of the session token handed out on invite acceptance.
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AccessState {
    pub config: Arc<AppConfig>,
    pub gate: SettingsGate,
    pub invites: InviteService,
}

fn typed_error(status: StatusCode, message: &str, kind: &str) -> JsonResponse {
    (status, Json(json!({ "message": message, "type": kind })))
}

fn error_response(err: AccessError) -> JsonResponse {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("Settings access request failed: {}", err);
        return failure_response(status, "An unexpected error occurred", err);
    }
    message_response(status, err.to_string())
}

fn admin_id(ctx: Option<Extension<AuthContext>>) -> Option<String> {
    ctx.map(|Extension(ctx)| ctx)
        .filter(AuthContext::is_admin)
        .map(|ctx| ctx.actor_id)
}

/// Whether the signed-in admin may open the Users and Developer sections.
#[axum::debug_handler]
pub async fn me_permissions_handler(
    State(state): State<Arc<AccessState>>,
    ctx: Option<Extension<AuthContext>>,
) -> JsonResponse {
    let allowed = match admin_id(ctx) {
        Some(id) => match state.gate.can_access(&id).await {
            Ok(allowed) => allowed,
            Err(e) => return error_response(e.into()),
        },
        None => false,
    };
    (StatusCode::OK, Json(json!({ ACCESS_FLAG: allowed })))
}

/// Grants or revokes the access flag. Only callers who pass the gate may change it.
#[axum::debug_handler]
pub async fn update_settings_access_handler(
    State(state): State<Arc<AccessState>>,
    ctx: Option<Extension<AuthContext>>,
    Path(user_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> JsonResponse {
    let Some(caller) = admin_id(ctx) else {
        return typed_error(StatusCode::UNAUTHORIZED, "Authentication required", "authentication_error");
    };

    match state.gate.can_access(&caller).await {
        Ok(true) => {}
        Ok(false) => {
            return typed_error(
                StatusCode::FORBIDDEN,
                "You do not have permission to change this setting.",
                "authorization_error",
            )
        }
        Err(e) => return error_response(e.into()),
    }

    let value = body.ok().and_then(|Json(body)| body.get(ACCESS_FLAG).and_then(Value::as_bool));
    let Some(value) = value else {
        return typed_error(
            StatusCode::BAD_REQUEST,
            "Body must include can_access_users_developer: true or false",
            "invalid_data",
        );
    };

    match state.invites.set_access_flag(&user_id, value).await {
        Ok(user) => {
            info!("{} set {}={} on {}", caller, ACCESS_FLAG, value, user.id);
            (StatusCode::OK, Json(json!({ "id": user.id, ACCESS_FLAG: value })))
        }
        Err(AccessError::UserNotFound) => {
            typed_error(StatusCode::NOT_FOUND, "User not found", "not_found")
        }
        Err(e) => error_response(e),
    }
}

#[axum::debug_handler]
pub async fn list_users_handler(State(state): State<Arc<AccessState>>) -> JsonResponse {
    match state.invites.list_users().await {
        Ok(users) => (
            StatusCode::OK,
            Json(json!({ "count": users.len(), "users": users })),
        ),
        Err(e) => error_response(e),
    }
}

#[axum::debug_handler]
pub async fn list_invites_handler(State(state): State<Arc<AccessState>>) -> JsonResponse {
    match state.invites.list_invites().await {
        Ok(invites) => (
            StatusCode::OK,
            Json(json!({ "count": invites.len(), "invites": invites })),
        ),
        Err(e) => error_response(e),
    }
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct CreateInviteRequest {
    pub email: Option<String>,
    /// Set `can_access_users_developer: true` to pre-grant the settings sections.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub metadata: Option<Metadata>,
}

#[axum::debug_handler]
pub async fn create_invite_handler(
    State(state): State<Arc<AccessState>>,
    body: Result<Json<CreateInviteRequest>, JsonRejection>,
) -> JsonResponse {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return message_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let email = req.email.unwrap_or_default();
    match state
        .invites
        .create_invite(&email, req.metadata.unwrap_or_default())
        .await
    {
        Ok(invite) => (StatusCode::OK, Json(json!({ "invite": invite }))),
        Err(e) => error_response(e),
    }
}

/// Public: the invitee signs up with the emailed token and gets a session token back.
#[axum::debug_handler]
pub async fn accept_invite_handler(
    State(state): State<Arc<AccessState>>,
    body: Result<Json<AcceptInvite>, JsonRejection>,
) -> JsonResponse {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let user = match state.invites.accept(input).await {
        Ok(user) => user,
        Err(e) => return error_response(e),
    };

    match issue_token(
        &state.config.http.jwt_secret,
        &user.id,
        ADMIN_ACTOR,
        Duration::days(SESSION_TTL_DAYS),
    ) {
        Ok(token) => (StatusCode::OK, Json(json!({ "token": token, "user": user }))),
        Err(e) => {
            error!("Failed to issue session token for {}: {}", user.id, e);
            failure_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue session token", e)
        }
    }
}
