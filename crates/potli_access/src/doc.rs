// --- File: crates/potli_access/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use crate::handlers::CreateInviteRequest;
use crate::invites::AcceptInvite;
use potli_common::models::{AdminUser, Invite};
use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
struct SettingsAccessRequest {
    can_access_users_developer: bool,
}

#[utoipa::path(
    get,
    path = "/admin/custom/me-permissions",
    responses((status = 200, description = "{can_access_users_developer}; false when signed out")),
    tag = "Settings Access"
)]
fn doc_me_permissions_handler() {}

#[utoipa::path(
    patch,
    path = "/admin/custom/users/{id}/settings-access",
    params(("id" = String, Path, description = "Target user id")),
    request_body(content = SettingsAccessRequest, example = json!({"can_access_users_developer": true})),
    responses(
        (status = 200, description = "{id, can_access_users_developer}"),
        (status = 400, description = "invalid_data"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "You do not have permission to change this setting."),
        (status = 404, description = "User not found")
    ),
    tag = "Settings Access"
)]
fn doc_update_settings_access_handler() {}

#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "{users, count}"),
        (status = 403, description = "Settings gate denied")
    ),
    tag = "Settings Access"
)]
fn doc_list_users_handler() {}

#[utoipa::path(
    get,
    path = "/admin/invites",
    responses((status = 200, description = "{invites, count}, newest first")),
    tag = "Settings Access"
)]
fn doc_list_invites_handler() {}

#[utoipa::path(
    post,
    path = "/admin/invites",
    request_body(content = CreateInviteRequest, example = json!({
        "email": "ops@techpotli.com",
        "metadata": {"can_access_users_developer": true}
    })),
    responses(
        (status = 200, description = "{invite}; an email follows"),
        (status = 400, description = "Email is required")
    ),
    tag = "Settings Access"
)]
fn doc_create_invite_handler() {}

#[utoipa::path(
    post,
    path = "/admin/invites/accept",
    request_body = AcceptInvite,
    responses(
        (status = 200, description = "{token, user}"),
        (status = 401, description = "Invalid or expired invite token."),
        (status = 409, description = "User with this email already exists")
    ),
    tag = "Settings Access"
)]
fn doc_accept_invite_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_me_permissions_handler,
        doc_update_settings_access_handler,
        doc_list_users_handler,
        doc_list_invites_handler,
        doc_create_invite_handler,
        doc_accept_invite_handler
    ),
    components(schemas(SettingsAccessRequest, CreateInviteRequest, AcceptInvite, AdminUser, Invite)),
    tags((name = "Settings Access", description = "Users & Developer sections, admin users and invites"))
)]
pub struct AccessApiDoc;
